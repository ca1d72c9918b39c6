//! One handle over every scoring engine.
//!
//! [`EngagementEngine`] owns the validated [`EngineConfig`] and the random
//! source. It adds the cross-engine rules: failed rewards fall back to the
//! base XP, failed wellness checks fall back to no intervention, and an active
//! intervention reshapes the next reward and difficulty.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::context::{TaskContext, UserContext};
use crate::error::{ConfigError, StreakError, ValidationError};
use crate::flow::{DifficultyAdjustment, FlowAssessor, FlowContext, FlowMetrics, PerformanceData};
use crate::habit::{
    BehaviorContext, Celebration, CelebrationScript, HabitConstraints, HabitEngine, MatAssessment,
    SessionStats, TinyHabitPlan,
};
use crate::psychology::{self, ActionOutcome, IntermittentReward, NearMissExperience};
use crate::reward::{RewardOptions, RewardResult, RewardScheduler};
use crate::rng::{self, EngineRng};
use crate::storage::EngineConfig;
use crate::streak::{
    RecoveryOption, Streak, StreakNotification, StreakRiskAssessment, StreakRiskEngine,
    StreakTracker, StreakType, StreakValue,
};
use crate::wellness::{
    Boundary, BoundaryPreferences, CurrentUsage, Intervention, InterventionType, UsageAnalysis,
    UsageRecord, UserState, WellnessGuardian, WellnessHistory, WellnessMetrics, WellnessReport,
};

/// What a task completion produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionOutcome {
    pub reward: RewardResult,
    /// `None` when the flow assessment could not run
    pub flow: Option<FlowMetrics>,
    /// The reward is the unmodified base XP because scoring failed
    pub reward_fallback: bool,
    /// An active intervention changed the reward or difficulty
    pub wellness_gated: bool,
}

pub struct EngagementEngine {
    config: EngineConfig,
    rng: EngineRng,
    rewards: RewardScheduler,
    flow: FlowAssessor,
    streaks: StreakRiskEngine,
    tracker: StreakTracker,
    habits: HabitEngine,
    guardian: WellnessGuardian,
}

impl EngagementEngine {
    /// Build an engine seeded from OS entropy.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] if the configuration is invalid or no
    /// entropy source is available.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = rng::from_entropy()?;
        Ok(Self::build(config, rng))
    }

    /// Build an engine with a reproducible random source.
    pub fn with_seed(config: EngineConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, rng::seeded(seed)))
    }

    fn build(config: EngineConfig, rng: EngineRng) -> Self {
        tracing::info!(
            strictness = ?config.wellness.strictness,
            max_freezes = config.streak.max_freezes,
            "engagement engine ready"
        );
        Self {
            rewards: RewardScheduler::with_config(config.reward.clone()),
            flow: FlowAssessor::with_config(config.flow.clone()),
            streaks: StreakRiskEngine::with_config(config.streak.clone()),
            tracker: StreakTracker::with_config(config.streak.clone()),
            habits: HabitEngine::with_config(config.habit.clone()),
            guardian: WellnessGuardian::with_config(config.wellness.clone()),
            config,
            rng,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Size the reward and recalibrate difficulty for a completed task.
    ///
    /// `gate` is the intervention currently in force, if any. A limit
    /// enforcement turns off bonus draws; a mandatory break pays the base XP
    /// only and keeps the next difficulty at or below the current one.
    pub fn complete_task(
        &mut self,
        base_xp: f64,
        user: &UserContext,
        task: &TaskContext,
        flow_context: Option<&FlowContext>,
        gate: Option<&Intervention>,
    ) -> CompletionOutcome {
        let gate_type = gate.map(|i| i.intervention_type);
        let options = RewardOptions {
            adaptive_adjustment: self.config.reward.adaptive_adjustment,
            suppress_bonus: gate_type.is_some_and(|t| t >= InterventionType::LimitEnforcement),
        };

        let (mut reward, reward_fallback) =
            match self
                .rewards
                .calculate_variable_reward(base_xp, user, &options, &mut self.rng)
            {
                Ok(reward) => (reward, false),
                Err(e) => {
                    tracing::warn!(error = %e, base_xp, "reward scoring failed, issuing base XP");
                    (RewardResult::unmodified(base_xp), true)
                }
            };

        let flow = match task
            .validate()
            .and_then(|_| self.flow.assess_flow_state(user.skill_level, task.difficulty, flow_context))
        {
            Ok(metrics) => Some(metrics),
            Err(e) => {
                tracing::warn!(error = %e, "flow assessment skipped");
                None
            }
        };

        let mut wellness_gated = options.suppress_bonus;
        let flow = if gate_type == Some(InterventionType::MandatoryBreak) {
            wellness_gated = true;
            if !reward_fallback {
                let mut dampened = RewardResult::unmodified(reward.base_xp);
                dampened.engagement_prediction = reward.engagement_prediction;
                dampened.rationale = format!(
                    "Earned {} XP. Rewards are held at base value until you take your break.",
                    crate::reward::format_xp(dampened.final_xp)
                );
                reward = dampened;
            }
            flow.map(|mut m| {
                m.next_task_difficulty = m.next_task_difficulty.min(m.difficulty);
                m
            })
        } else {
            flow
        };

        if wellness_gated {
            tracing::debug!(gate = ?gate_type, "completion gated by wellness intervention");
        }

        CompletionOutcome {
            reward,
            flow,
            reward_fallback,
            wellness_gated,
        }
    }

    /// Run one wellness tick, never failing the session.
    pub fn wellness_check(
        &self,
        records: &[UsageRecord],
        user_state: &UserState,
        history: &WellnessHistory,
        preferences: &BoundaryPreferences,
        usage: &CurrentUsage,
    ) -> WellnessReport {
        match self.try_wellness_check(records, user_state, history, preferences, usage) {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!(error = %e, "wellness assessment failed, no intervention");
                WellnessReport::no_intervention()
            }
        }
    }

    /// Run one wellness tick, surfacing invalid input instead of a neutral report.
    ///
    /// Callers that persist the result use this so a rejected tick never
    /// overwrites stored history.
    pub fn try_wellness_check(
        &self,
        records: &[UsageRecord],
        user_state: &UserState,
        history: &WellnessHistory,
        preferences: &BoundaryPreferences,
        usage: &CurrentUsage,
    ) -> Result<WellnessReport, ValidationError> {
        self.guardian
            .evaluate(records, user_state, history, preferences, usage)
    }

    /// Boundary preferences seeded from the configured strictness.
    pub fn default_preferences(&self) -> BoundaryPreferences {
        BoundaryPreferences {
            strictness: self.config.wellness.strictness,
            ..Default::default()
        }
    }

    // Reward and psychology helpers

    pub fn calculate_variable_reward(
        &mut self,
        base_xp: f64,
        user: &UserContext,
        options: &RewardOptions,
    ) -> Result<RewardResult, ValidationError> {
        self.rewards
            .calculate_variable_reward(base_xp, user, options, &mut self.rng)
    }

    pub fn generate_near_miss_experience(
        &self,
        target: f64,
        achieved: f64,
    ) -> Result<NearMissExperience, ValidationError> {
        psychology::generate_near_miss_experience(target, achieved)
    }

    pub fn calculate_intermittent_reward(
        &mut self,
        action_type: &str,
        history: &[ActionOutcome],
    ) -> IntermittentReward {
        psychology::calculate_intermittent_reward(action_type, history, &mut self.rng)
    }

    // Flow

    pub fn assess_flow_state(
        &self,
        skill: f64,
        difficulty: f64,
        context: Option<&FlowContext>,
    ) -> Result<FlowMetrics, ValidationError> {
        self.flow.assess_flow_state(skill, difficulty, context)
    }

    pub fn suggest_difficulty_adjustment(
        &self,
        metrics: &FlowMetrics,
        performance: &PerformanceData,
    ) -> Result<DifficultyAdjustment, ValidationError> {
        self.flow.suggest_difficulty_adjustment(metrics, performance)
    }

    // Streaks

    pub fn start_streak(&self, streak_type: StreakType) -> Streak {
        self.tracker.start(streak_type)
    }

    pub fn record_activity(&self, streak: &Streak, at: DateTime<Utc>) -> Streak {
        self.tracker.record_activity(streak, at)
    }

    pub fn apply_freeze(&self, streak: &Streak, now: DateTime<Utc>) -> Result<Streak, StreakError> {
        self.tracker.apply_freeze(streak, now)
    }

    pub fn reset_streak(&self, streak: &Streak) -> Streak {
        self.tracker.reset(streak)
    }

    pub fn calculate_streak_value(&self, streak: &Streak) -> StreakValue {
        self.streaks.calculate_streak_value(streak)
    }

    pub fn assess_streak_risk(&self, streak: &Streak, now: DateTime<Utc>) -> StreakRiskAssessment {
        self.streaks.assess_streak_risk(streak, now)
    }

    pub fn generate_loss_aversion_notification(
        &self,
        assessment: &StreakRiskAssessment,
        streak: &Streak,
    ) -> StreakNotification {
        self.streaks
            .generate_loss_aversion_notification(assessment, streak)
    }

    pub fn calculate_recovery_options(&self, broken: &Streak, now: DateTime<Utc>) -> RecoveryOption {
        self.streaks.calculate_recovery_options(broken, now)
    }

    // Habits

    pub fn assess_mat(
        &self,
        user: &UserContext,
        task: &TaskContext,
        context: &BehaviorContext,
    ) -> Result<MatAssessment, ValidationError> {
        self.habits.assess_mat(user, task, context)
    }

    pub fn create_tiny_habits(
        &self,
        target_behavior: &str,
        constraints: &HabitConstraints,
    ) -> Result<TinyHabitPlan, ValidationError> {
        self.habits.create_tiny_habits(target_behavior, constraints)
    }

    pub fn celebrate_success(
        &self,
        behavior: &str,
        script: &CelebrationScript,
        stats: &SessionStats,
    ) -> Result<Celebration, ValidationError> {
        self.habits.celebrate_success(behavior, script, stats)
    }

    // Wellness

    pub fn analyze_usage_patterns(
        &self,
        records: &[UsageRecord],
        user_state: &UserState,
    ) -> Result<UsageAnalysis, ValidationError> {
        self.guardian.analyze_usage_patterns(records, user_state)
    }

    pub fn assess_wellness_metrics(
        &self,
        analysis: &UsageAnalysis,
        history: &WellnessHistory,
    ) -> WellnessMetrics {
        self.guardian.assess_wellness_metrics(analysis, history)
    }

    pub fn create_healthy_boundaries(
        &self,
        metrics: &WellnessMetrics,
        preferences: &BoundaryPreferences,
    ) -> Vec<Boundary> {
        self.guardian.create_healthy_boundaries(metrics, preferences)
    }

    pub fn generate_intervention(
        &self,
        boundary: &Boundary,
        usage: &CurrentUsage,
        metrics: &WellnessMetrics,
    ) -> Intervention {
        self.guardian.generate_intervention(boundary, usage, metrics)
    }
}
