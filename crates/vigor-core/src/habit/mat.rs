//! Motivation-Ability-Trigger scoring (BJ Fogg behavior model).

use serde::{Deserialize, Serialize};

use crate::context::{TaskContext, UserContext};
use crate::error::ValidationError;
use crate::storage::HabitConfig;

/// Situation the behavior would happen in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BehaviorContext {
    /// Local hour of day (0-23)
    pub hour: u32,
    /// Ambient distraction (0.0-1.0)
    pub distraction_level: f64,
    /// Someone is there to keep the user accountable
    pub social_support: bool,
}

impl Default for BehaviorContext {
    fn default() -> Self {
        Self {
            hour: 9,
            distraction_level: 0.3,
            social_support: false,
        }
    }
}

/// Which trigger fits the limiting factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerType {
    /// Motivation and ability are both there; a reminder is enough
    Signal,
    /// Motivated but the task is hard; make it easier
    Facilitator,
    /// Able but unmotivated; provide a reason
    Spark,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    #[serde(rename = "type")]
    pub trigger_type: TriggerType,
    pub rationale: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationLever {
    ShrinkTask,
    ScheduleAtHigherEnergy,
    AddSocialAccountability,
    ReduceDistractions,
    ConnectToPurpose,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedChange {
    pub lever: OptimizationLever,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Optimization {
    pub suggested_changes: Vec<SuggestedChange>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatAssessment {
    /// 0.0-1.0
    pub motivation: f64,
    /// 0.0-1.0
    pub ability: f64,
    /// Probability the behavior happens now (0.0-1.0)
    pub likelihood: f64,
    /// Motivation x ability
    pub fogg_score: f64,
    /// Whether the fogg score clears the action line
    pub above_action_line: bool,
    pub trigger: Trigger,
    pub optimization: Optimization,
}

/// Score motivation, ability and the right trigger for a task.
pub fn assess_mat(
    config: &HabitConfig,
    user: &UserContext,
    task: &TaskContext,
    context: &BehaviorContext,
) -> Result<MatAssessment, ValidationError> {
    user.validate()?;
    task.validate()?;
    ValidationError::check_range("hour", context.hour as f64, 0.0, 23.0)?;
    ValidationError::check_range("distraction_level", context.distraction_level, 0.0, 1.0)?;

    let (peak_start, peak_end) = config.peak_hours;
    let time_boost = if (peak_start..peak_end).contains(&context.hour) {
        0.1
    } else if context.hour >= 22 || context.hour < 6 {
        -0.1
    } else {
        0.0
    };
    let motivation =
        (user.motivation / 10.0 + task.priority.motivation_boost() + time_boost).clamp(0.0, 1.0);

    let duration_ease = 1.0 - 0.5 * (task.estimated_minutes / 120.0).min(1.0);
    let ability = (0.35 * duration_ease
        + 0.25 * user.energy
        + 0.2 * (1.0 - context.distraction_level)
        + 0.1 * if context.social_support { 1.0 } else { 0.0 }
        + 0.1 * (1.0 - task.difficulty / 10.0))
        .clamp(0.0, 1.0);

    let fogg_score = motivation * ability;
    let likelihood =
        1.0 / (1.0 + (-config.likelihood_steepness * (fogg_score - config.action_line)).exp());

    let trigger = choose_trigger(motivation, ability);
    let optimization = Optimization {
        suggested_changes: suggest_changes(user, task, context, motivation, ability),
    };

    tracing::debug!(motivation, ability, likelihood, "MAT assessed");

    Ok(MatAssessment {
        motivation,
        ability,
        likelihood,
        fogg_score,
        above_action_line: fogg_score >= config.action_line,
        trigger,
        optimization,
    })
}

fn choose_trigger(motivation: f64, ability: f64) -> Trigger {
    if motivation >= 0.5 && ability >= 0.5 {
        Trigger {
            trigger_type: TriggerType::Signal,
            rationale: "Motivation and ability are both high; a simple reminder will do."
                .to_string(),
        }
    } else if motivation >= ability {
        Trigger {
            trigger_type: TriggerType::Facilitator,
            rationale: format!(
                "Ability ({:.0}%) is the limiting factor; make the behavior easier to start.",
                ability * 100.0
            ),
        }
    } else {
        Trigger {
            trigger_type: TriggerType::Spark,
            rationale: format!(
                "Motivation ({:.0}%) is the limiting factor; pair the prompt with a reason to act.",
                motivation * 100.0
            ),
        }
    }
}

fn suggest_changes(
    user: &UserContext,
    task: &TaskContext,
    context: &BehaviorContext,
    motivation: f64,
    ability: f64,
) -> Vec<SuggestedChange> {
    let mut changes = Vec::new();

    if task.estimated_minutes > 25.0 || task.difficulty > 6.0 {
        changes.push(SuggestedChange {
            lever: OptimizationLever::ShrinkTask,
            description: format!(
                "Shrink the task: start with a 2-minute version instead of {:.0} minutes.",
                task.estimated_minutes
            ),
        });
    }
    if user.energy < 0.5 {
        changes.push(SuggestedChange {
            lever: OptimizationLever::ScheduleAtHigherEnergy,
            description: "Schedule this for a time of day when your energy is higher.".to_string(),
        });
    }
    if context.distraction_level > 0.5 {
        changes.push(SuggestedChange {
            lever: OptimizationLever::ReduceDistractions,
            description: "Silence notifications and clear your workspace before starting."
                .to_string(),
        });
    }
    if !context.social_support && (motivation < 0.7 || ability < 0.7) {
        changes.push(SuggestedChange {
            lever: OptimizationLever::AddSocialAccountability,
            description: "Tell a friend or partner when you plan to do it.".to_string(),
        });
    }
    if motivation < 0.5 {
        changes.push(SuggestedChange {
            lever: OptimizationLever::ConnectToPurpose,
            description: "Write down why this matters to you before you begin.".to_string(),
        });
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::PriorityTier;

    fn user(motivation: f64, energy: f64) -> UserContext {
        UserContext {
            motivation,
            energy,
            ..Default::default()
        }
    }

    fn task(minutes: f64, difficulty: f64, priority: PriorityTier) -> TaskContext {
        TaskContext {
            difficulty,
            estimated_minutes: minutes,
            priority,
        }
    }

    #[test]
    fn test_high_motivation_and_ability_gets_signal() {
        let result = assess_mat(
            &HabitConfig::default(),
            &user(9.0, 0.9),
            &task(5.0, 2.0, PriorityTier::High),
            &BehaviorContext {
                hour: 9,
                distraction_level: 0.1,
                social_support: true,
            },
        )
        .unwrap();

        assert_eq!(result.trigger.trigger_type, TriggerType::Signal);
        assert!(result.likelihood > 0.9);
        assert!(result.above_action_line);
    }

    #[test]
    fn test_both_factors_needed_for_high_likelihood() {
        let config = HabitConfig::default();
        let hard_task = task(120.0, 9.0, PriorityTier::Critical);
        let context = BehaviorContext {
            hour: 15,
            distraction_level: 0.9,
            social_support: false,
        };
        let result = assess_mat(&config, &user(10.0, 0.1), &hard_task, &context).unwrap();

        assert!(result.motivation > 0.9);
        assert!(result.ability < 0.4);
        assert!(result.likelihood < 0.6);
        assert_eq!(result.trigger.trigger_type, TriggerType::Facilitator);
        let levers: Vec<_> = result.optimization.suggested_changes.iter().map(|c| c.lever).collect();
        assert!(levers.contains(&OptimizationLever::ShrinkTask));
        assert!(levers.contains(&OptimizationLever::ScheduleAtHigherEnergy));
        assert!(levers.contains(&OptimizationLever::ReduceDistractions));
    }

    #[test]
    fn test_low_motivation_gets_spark() {
        let result = assess_mat(
            &HabitConfig::default(),
            &user(1.0, 0.9),
            &task(5.0, 1.0, PriorityTier::Low),
            &BehaviorContext {
                hour: 23,
                distraction_level: 0.1,
                social_support: false,
            },
        )
        .unwrap();
        assert_eq!(result.trigger.trigger_type, TriggerType::Spark);
        assert!(result
            .optimization
            .suggested_changes
            .iter()
            .any(|c| c.lever == OptimizationLever::ConnectToPurpose));
    }

    #[test]
    fn test_peak_hours_boost_motivation() {
        let config = HabitConfig::default();
        let t = task(10.0, 3.0, PriorityTier::Medium);
        let at_hour = |hour| BehaviorContext {
            hour,
            ..Default::default()
        };
        let morning = assess_mat(&config, &user(5.0, 0.6), &t, &at_hour(9)).unwrap();
        let afternoon = assess_mat(&config, &user(5.0, 0.6), &t, &at_hour(15)).unwrap();
        assert!(morning.motivation > afternoon.motivation);
    }

    #[test]
    fn test_invalid_hour_rejected() {
        let result = assess_mat(
            &HabitConfig::default(),
            &UserContext::default(),
            &task(5.0, 1.0, PriorityTier::Low),
            &BehaviorContext {
                hour: 24,
                ..Default::default()
            },
        );
        assert!(result.is_err());
    }
}
