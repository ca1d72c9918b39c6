//! # Vigor Core Library
//!
//! Behavioral engagement scoring and wellness regulation for productivity apps.
//! Every engine is a pure computation over a caller-supplied snapshot: callers
//! own streaks and usage history, pass them in, and persist what comes back.
//!
//! ## Architecture
//!
//! - **Psychology helpers**: near-miss detection and intermittent reward draws
//! - **Reward scheduling**: variable-ratio XP sizing clamped to a fixed band
//! - **Flow**: challenge/skill classification and difficulty tuning
//! - **Streaks**: loss-aversion valuation, breakage risk, recovery and lifecycle
//! - **Habits**: Fogg MAT scoring and tiny-habit chains
//! - **Wellness**: usage analysis, burnout assessment, boundaries and interventions
//!
//! ## Key Components
//!
//! - [`EngagementEngine`]: Single handle over all engines with fallbacks and gating
//! - [`EngineConfig`]: TOML configuration holding every threshold
//! - [`SnapshotStore`]: Per-user persistence for callers

pub mod context;
pub mod engine;
pub mod error;
pub mod flow;
pub mod habit;
pub mod levels;
pub mod psychology;
pub mod reward;
pub mod rng;
pub mod storage;
pub mod streak;
pub mod wellness;

pub use context::{PriorityTier, TaskContext, UserContext};
pub use engine::{CompletionOutcome, EngagementEngine};
pub use error::{ConfigError, CoreError, StreakError, ValidationError};
pub use flow::{FlowAssessor, FlowContext, FlowMetrics, FlowZone, PerformanceData};
pub use habit::{HabitEngine, MatAssessment, TinyHabitPlan};
pub use levels::{RiskLevel, Urgency};
pub use reward::{RewardOptions, RewardResult, RewardScheduler};
pub use storage::{data_dir, EngineConfig, JsonFileStore, MemoryStore, SnapshotStore, UserSnapshot};
pub use streak::{Streak, StreakRiskAssessment, StreakRiskEngine, StreakTracker, StreakType};
pub use wellness::{
    Boundary, BoundaryPreferences, CurrentUsage, Intervention, InterventionType, UsageRecord,
    UserState, WellnessGuardian, WellnessHistory, WellnessMetrics, WellnessReport,
};
