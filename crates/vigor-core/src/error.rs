//! Core error types for vigor-core.
//!
//! Every engine entry point validates its numeric inputs and reports problems
//! through this hierarchy instead of clamping silently.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for vigor-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Input validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Streak lifecycle errors
    #[error("Streak error: {0}")]
    Streak(#[from] StreakError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// The random source could not be initialized
    #[error("Random source unavailable: {0}")]
    RandomSource(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Value is NaN or infinite
    #[error("Value for '{field}' must be a finite number")]
    NotFinite { field: String },

    /// Value outside of its defined range
    #[error("Value {value} for '{field}' is outside [{min}, {max}]")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Required input was empty
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl ValidationError {
    /// Checks that `value` is finite and inside `[min, max]`.
    pub fn check_range(field: &str, value: f64, min: f64, max: f64) -> Result<(), Self> {
        if !value.is_finite() {
            return Err(ValidationError::NotFinite {
                field: field.to_string(),
            });
        }
        if value < min || value > max {
            return Err(ValidationError::OutOfRange {
                field: field.to_string(),
                value,
                min,
                max,
            });
        }
        Ok(())
    }

    /// Checks that `value` is finite and not negative.
    pub fn check_non_negative(field: &str, value: f64) -> Result<(), Self> {
        Self::check_range(field, value, 0.0, f64::MAX)
    }
}

/// Streak lifecycle errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreakError {
    /// No freezes left in the protection budget
    #[error("Freeze budget exhausted: {used} of {max} freezes already used")]
    FreezeBudgetExhausted { used: u32, max: u32 },

    /// Operation needs a streak that has seen activity
    #[error("Streak has no recorded activity")]
    NotActive,
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
