//! Read-only snapshots supplied by the caller on every invocation.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// What the engine knows about the user at call time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserContext {
    /// Recent engagement (0.0-1.0)
    pub recent_engagement: f64,
    /// Current streak length in days
    pub streak_length: u32,
    /// Task completion rate (0.0-1.0)
    pub task_completion_rate: f64,
    /// Hours since the last reward was issued
    pub hours_since_last_reward: f64,
    pub user_level: u32,
    /// Skill level (0.0-10.0)
    pub skill_level: f64,
    /// Motivation (0.0-10.0)
    pub motivation: f64,
    /// Energy (0.0-1.0)
    pub energy: f64,
}

impl Default for UserContext {
    fn default() -> Self {
        Self {
            recent_engagement: 0.5,
            streak_length: 0,
            task_completion_rate: 0.5,
            hours_since_last_reward: 0.0,
            user_level: 1,
            skill_level: 5.0,
            motivation: 5.0,
            energy: 0.5,
        }
    }
}

impl UserContext {
    pub fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::check_range("recent_engagement", self.recent_engagement, 0.0, 1.0)?;
        ValidationError::check_range("task_completion_rate", self.task_completion_rate, 0.0, 1.0)?;
        ValidationError::check_non_negative("hours_since_last_reward", self.hours_since_last_reward)?;
        ValidationError::check_range("skill_level", self.skill_level, 0.0, 10.0)?;
        ValidationError::check_range("motivation", self.motivation, 0.0, 10.0)?;
        ValidationError::check_range("energy", self.energy, 0.0, 1.0)?;
        Ok(())
    }
}

/// Priority tier of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityTier {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl PriorityTier {
    /// Motivation shift attributed to the tier.
    pub fn motivation_boost(&self) -> f64 {
        match self {
            PriorityTier::Low => -0.05,
            PriorityTier::Medium => 0.0,
            PriorityTier::High => 0.1,
            PriorityTier::Critical => 0.2,
        }
    }
}

/// The task being completed or planned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskContext {
    /// Difficulty (0.0-10.0)
    pub difficulty: f64,
    /// Estimated duration in minutes
    pub estimated_minutes: f64,
    #[serde(default)]
    pub priority: PriorityTier,
}

impl TaskContext {
    pub fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::check_range("difficulty", self.difficulty, 0.0, 10.0)?;
        ValidationError::check_non_negative("estimated_minutes", self.estimated_minutes)?;
        Ok(())
    }
}
