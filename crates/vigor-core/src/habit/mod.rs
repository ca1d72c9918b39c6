//! Habit formation: Fogg MAT scoring and tiny-habit chains.

mod mat;
mod tiny;

pub use mat::{
    assess_mat, BehaviorContext, MatAssessment, Optimization, OptimizationLever, SuggestedChange,
    Trigger, TriggerType,
};
pub use tiny::{
    celebrate_success, create_tiny_habits, Celebration, CelebrationScript, HabitConstraints,
    LevelUnlock, SessionStats, TinyHabit, TinyHabitPlan, MAX_TINY_DIFFICULTY,
};

use crate::context::{TaskContext, UserContext};
use crate::error::ValidationError;
use crate::storage::HabitConfig;

/// Habit formation engine bound to a [`HabitConfig`].
pub struct HabitEngine {
    config: HabitConfig,
}

impl HabitEngine {
    pub fn new() -> Self {
        Self {
            config: HabitConfig::default(),
        }
    }

    pub fn with_config(config: HabitConfig) -> Self {
        Self { config }
    }

    pub fn assess_mat(
        &self,
        user: &UserContext,
        task: &TaskContext,
        context: &BehaviorContext,
    ) -> Result<MatAssessment, ValidationError> {
        mat::assess_mat(&self.config, user, task, context)
    }

    pub fn create_tiny_habits(
        &self,
        target_behavior: &str,
        constraints: &HabitConstraints,
    ) -> Result<TinyHabitPlan, ValidationError> {
        tiny::create_tiny_habits(&self.config, target_behavior, constraints)
    }

    pub fn celebrate_success(
        &self,
        behavior: &str,
        script: &CelebrationScript,
        stats: &SessionStats,
    ) -> Result<Celebration, ValidationError> {
        tiny::celebrate_success(&self.config, behavior, script, stats)
    }
}

impl Default for HabitEngine {
    fn default() -> Self {
        Self::new()
    }
}
