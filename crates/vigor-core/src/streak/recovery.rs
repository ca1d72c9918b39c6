use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::risk::StreakRiskEngine;
use super::Streak;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryType {
    Full,
    Partial,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryOption {
    pub is_eligible: bool,
    pub recovery_type: RecoveryType,
    pub cost_in_xp: f64,
    pub recovered_length: u32,
    pub motivational_message: String,
}

impl RecoveryOption {
    fn none(message: String) -> Self {
        Self {
            is_eligible: false,
            recovery_type: RecoveryType::None,
            cost_in_xp: 0.0,
            recovered_length: 0,
            motivational_message: message,
        }
    }
}

/// Recovery terms for a streak whose window has elapsed.
///
/// Only streaks of at least `recovery_min_length` qualify. Inside the grace
/// window the whole streak comes back; inside the partial window a fraction
/// does; after that the user starts over.
pub(super) fn recovery_options(
    engine: &StreakRiskEngine,
    broken: &Streak,
    now: DateTime<Utc>,
) -> RecoveryOption {
    let c = engine.config();
    let length = broken.current_length;

    let Some(hours_since) = broken.hours_since_activity(now) else {
        return RecoveryOption::none("Start your first streak today!".to_string());
    };

    let window = broken.streak_type.window_hours();
    if hours_since <= window {
        return RecoveryOption::none(format!(
            "Your {} streak is still alive. No recovery needed.",
            broken.length_label()
        ));
    }

    if length < c.recovery_min_length {
        return RecoveryOption::none(format!(
            "Every streak starts with day one. Bounce back and beat your {} record!",
            broken.longest_ever.max(length)
        ));
    }

    let break_age = hours_since - window;
    let base_cost = length as f64 * c.xp_per_day;

    let option = if break_age <= c.full_recovery_grace_hours {
        RecoveryOption {
            is_eligible: true,
            recovery_type: RecoveryType::Full,
            cost_in_xp: (base_cost * c.full_recovery_cost_factor).round(),
            recovered_length: length,
            motivational_message: format!(
                "Bounce back now and keep all {length} days of your streak. Nothing is lost yet!"
            ),
        }
    } else if break_age <= c.partial_recovery_hours {
        let recovered = ((length as f64 * c.partial_recovery_fraction).floor() as u32).max(1);
        RecoveryOption {
            is_eligible: true,
            recovery_type: RecoveryType::Partial,
            cost_in_xp: (base_cost * c.partial_recovery_cost_factor).round(),
            recovered_length: recovered,
            motivational_message: format!(
                "Bounce back with {recovered} of your {length} days restored. Your progress still counts."
            ),
        }
    } else {
        RecoveryOption::none(format!(
            "Your {length}-day run proved you can do it. Bounce back and start a new streak today."
        ))
    };

    tracing::debug!(
        length,
        break_age,
        recovery = ?option.recovery_type,
        "recovery options computed"
    );

    option
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::streak::StreakType;
    use chrono::Duration;

    fn broken(length: u32, hours_ago: i64, now: DateTime<Utc>) -> Streak {
        Streak {
            current_length: length,
            longest_ever: length,
            last_activity: Some(now - Duration::hours(hours_ago)),
            streak_type: StreakType::Daily,
            value_in_xp: 0.0,
            protection_level: 0,
            freezes_used: 0,
            max_freezes: 2,
        }
    }

    #[test]
    fn test_twenty_one_days_at_26_hours_is_partial() {
        let engine = StreakRiskEngine::new();
        let now = Utc::now();
        let option = engine.calculate_recovery_options(&broken(21, 26, now), now);
        assert!(option.is_eligible);
        assert_eq!(option.recovery_type, RecoveryType::Partial);
        assert_eq!(option.recovered_length, 10);
        assert!(option.cost_in_xp > 0.0);
        assert!(option.motivational_message.contains("Bounce back"));
    }

    #[test]
    fn test_just_broken_is_full() {
        let engine = StreakRiskEngine::new();
        let now = Utc::now();
        let option = engine.calculate_recovery_options(
            &Streak {
                last_activity: Some(now - Duration::minutes(24 * 60 + 30)),
                ..broken(21, 0, now)
            },
            now,
        );
        assert_eq!(option.recovery_type, RecoveryType::Full);
        assert_eq!(option.recovered_length, 21);
    }

    #[test]
    fn test_short_streak_not_eligible() {
        let engine = StreakRiskEngine::new();
        let now = Utc::now();
        let option = engine.calculate_recovery_options(&broken(13, 25, now), now);
        assert!(!option.is_eligible);
        assert_eq!(option.recovery_type, RecoveryType::None);
    }

    #[test]
    fn test_long_broken_not_eligible() {
        let engine = StreakRiskEngine::new();
        let now = Utc::now();
        let option = engine.calculate_recovery_options(&broken(40, 72, now), now);
        assert_eq!(option.recovery_type, RecoveryType::None);
        assert!(!option.is_eligible);
    }

    #[test]
    fn test_cost_scales_with_length() {
        let engine = StreakRiskEngine::new();
        let now = Utc::now();
        let short = engine.calculate_recovery_options(&broken(14, 30, now), now);
        let long = engine.calculate_recovery_options(&broken(40, 30, now), now);
        assert!(long.cost_in_xp > short.cost_in_xp);
    }

    #[test]
    fn test_alive_streak_needs_no_recovery() {
        let engine = StreakRiskEngine::new();
        let now = Utc::now();
        let option = engine.calculate_recovery_options(&broken(30, 5, now), now);
        assert!(!option.is_eligible);
    }
}
