//! Challenge/skill balance classification and difficulty tuning.
//!
//! The challenge/skill ratio (difficulty / skill) places the user in one of
//! three zones. Boundaries come from [`FlowConfig`] and keep the ordering
//! boredom < flow < anxiety.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::storage::FlowConfig;

/// Where the challenge/skill ratio falls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowZone {
    /// Skill exceeds challenge
    Boredom,
    /// Challenge matches skill
    Flow,
    /// Challenge exceeds skill
    Anxiety,
}

/// Optional signals that refine the flow score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowContext {
    /// Share of recent tasks completed successfully (0.0-1.0)
    pub recent_success_rate: f64,
    /// Energy (0.0-1.0)
    pub energy: f64,
    /// Minutes spent in the current session
    pub session_minutes: f64,
}

impl Default for FlowContext {
    fn default() -> Self {
        Self {
            recent_success_rate: 0.75,
            energy: 0.7,
            session_minutes: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowMetrics {
    pub skill_level: f64,
    pub difficulty: f64,
    pub challenge_skill_ratio: f64,
    pub flow_zone_status: FlowZone,
    /// 0.0-1.0
    pub flow_score: f64,
    pub recommended_adjustment: String,
    pub next_task_difficulty: f64,
}

/// Recent performance used to tune difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceData {
    /// 0.0-1.0
    pub completion_rate: f64,
    /// Self-reported or inferred frustration (0.0-1.0)
    pub frustration: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionType {
    Increase,
    Decrease,
    Maintain,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyAdjustment {
    pub suggestion_type: SuggestionType,
    pub difficulty_delta: f64,
    pub estimated_flow_improvement: f64,
    pub rationale: String,
}

pub struct FlowAssessor {
    config: FlowConfig,
}

impl FlowAssessor {
    pub fn new() -> Self {
        Self {
            config: FlowConfig::default(),
        }
    }

    pub fn with_config(config: FlowConfig) -> Self {
        Self { config }
    }

    /// Zone for a challenge/skill ratio.
    pub fn classify(&self, ratio: f64) -> FlowZone {
        if ratio < self.config.boredom_below {
            FlowZone::Boredom
        } else if ratio <= self.config.anxiety_above {
            FlowZone::Flow
        } else {
            FlowZone::Anxiety
        }
    }

    /// Gaussian closeness of `ratio` to the optimal ratio (1.0 at the optimum).
    fn proximity(&self, ratio: f64) -> f64 {
        let z = (ratio - self.config.optimal_ratio) / self.config.proximity_width;
        (-z * z).exp()
    }

    /// Classify the current challenge/skill balance.
    ///
    /// # Errors
    /// `skill` must be in (0, 10] and `difficulty` in [0, 10].
    pub fn assess_flow_state(
        &self,
        skill: f64,
        difficulty: f64,
        context: Option<&FlowContext>,
    ) -> Result<FlowMetrics, ValidationError> {
        check_skill_and_difficulty(skill, difficulty)?;
        let ctx = context.copied().unwrap_or_default();
        ValidationError::check_range("recent_success_rate", ctx.recent_success_rate, 0.0, 1.0)?;
        ValidationError::check_range("energy", ctx.energy, 0.0, 1.0)?;
        ValidationError::check_non_negative("session_minutes", ctx.session_minutes)?;

        let c = &self.config;
        let ratio = difficulty / skill;
        let zone = self.classify(ratio);

        let mut score = c.proximity_weight * self.proximity(ratio)
            + c.success_weight * ctx.recent_success_rate
            + c.energy_weight * ctx.energy;
        if ctx.session_minutes > c.fatigue_onset_minutes {
            let fatigue = (ctx.session_minutes - c.fatigue_onset_minutes) / c.fatigue_span_minutes;
            score *= (1.0 - fatigue).max(0.5);
        }
        let flow_score = score.clamp(0.0, 1.0);

        let recommended_adjustment = match zone {
            FlowZone::Flow => {
                "You're in the flow zone: maintain this challenge level and deepen focus."
            }
            FlowZone::Boredom => {
                "Challenge is below your skill: increase difficulty or add a stretch goal."
            }
            FlowZone::Anxiety => {
                "Challenge exceeds your skill: reduce difficulty, break the task down or add support."
            }
        }
        .to_string();

        let next_task_difficulty = self.next_difficulty(skill, difficulty);

        tracing::debug!(ratio, ?zone, flow_score, "flow state assessed");

        Ok(FlowMetrics {
            skill_level: skill,
            difficulty,
            challenge_skill_ratio: ratio,
            flow_zone_status: zone,
            flow_score,
            recommended_adjustment,
            next_task_difficulty,
        })
    }

    /// Slightly above skill, never more than one step away from `difficulty`.
    fn next_difficulty(&self, skill: f64, difficulty: f64) -> f64 {
        let step = self.config.max_difficulty_step;
        let target = skill * self.config.optimal_ratio;
        let next = target.clamp(difficulty - step, difficulty + step).clamp(0.0, 10.0);
        (next * 10.0).round() / 10.0
    }

    /// Suggest how to move difficulty given recent performance.
    pub fn suggest_difficulty_adjustment(
        &self,
        metrics: &FlowMetrics,
        performance: &PerformanceData,
    ) -> Result<DifficultyAdjustment, ValidationError> {
        ValidationError::check_range("completion_rate", performance.completion_rate, 0.0, 1.0)?;
        ValidationError::check_range("frustration", performance.frustration, 0.0, 1.0)?;
        check_skill_and_difficulty(metrics.skill_level, metrics.difficulty)?;

        let step = self.config.max_difficulty_step;
        let ideal = metrics.skill_level * self.config.optimal_ratio;
        let gap = ideal - metrics.difficulty;
        let struggling = performance.completion_rate < 0.5 || performance.frustration > 0.6;

        let (suggestion_type, delta, rationale) = match metrics.flow_zone_status {
            FlowZone::Anxiety if struggling => (
                SuggestionType::Decrease,
                gap.clamp(-2.0 * step, -0.5),
                format!(
                    "Signs of anxiety: completion rate {:.0}% with frustration at {:.0}%. Lower the difficulty to rebuild confidence.",
                    performance.completion_rate * 100.0,
                    performance.frustration * 100.0
                ),
            ),
            FlowZone::Anxiety => (
                SuggestionType::Decrease,
                -0.5,
                "Mild anxiety zone: you're coping, but a slightly easier task keeps you in flow."
                    .to_string(),
            ),
            FlowZone::Boredom => (
                SuggestionType::Increase,
                gap.clamp(0.5, 2.0 * step),
                "Boredom zone: your skill outpaces the work. Raise the difficulty to re-engage."
                    .to_string(),
            ),
            FlowZone::Flow if performance.completion_rate > 0.85 && performance.frustration < 0.3 => (
                SuggestionType::Increase,
                0.5,
                "Steady flow with high success: nudge difficulty up to keep growing.".to_string(),
            ),
            FlowZone::Flow if performance.completion_rate < 0.4 || performance.frustration > 0.7 => (
                SuggestionType::Decrease,
                -0.5,
                "Flow is slipping: ease off slightly before it turns into anxiety.".to_string(),
            ),
            FlowZone::Flow => (
                SuggestionType::Maintain,
                0.0,
                "Balanced challenge: maintain the current difficulty.".to_string(),
            ),
        };

        let new_difficulty = (metrics.difficulty + delta).clamp(0.0, 10.0);
        let current = self.proximity(metrics.challenge_skill_ratio);
        let projected = self.proximity(new_difficulty / metrics.skill_level);
        let estimated_flow_improvement = (projected - current).max(0.0);

        Ok(DifficultyAdjustment {
            suggestion_type,
            difficulty_delta: delta,
            estimated_flow_improvement,
            rationale,
        })
    }
}

/// `skill` must be in (0, 10] and `difficulty` in [0, 10].
fn check_skill_and_difficulty(skill: f64, difficulty: f64) -> Result<(), ValidationError> {
    ValidationError::check_range("skill", skill, 0.0, 10.0)?;
    ValidationError::check_range("difficulty", difficulty, 0.0, 10.0)?;
    if skill == 0.0 {
        return Err(ValidationError::InvalidValue {
            field: "skill".to_string(),
            message: "must be greater than zero to form a challenge/skill ratio".to_string(),
        });
    }
    Ok(())
}

impl Default for FlowAssessor {
    fn default() -> Self {
        Self::new()
    }
}
