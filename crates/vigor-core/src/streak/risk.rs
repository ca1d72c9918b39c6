use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::recovery::{self, RecoveryOption};
use super::Streak;
use crate::levels::{RiskLevel, Urgency};
use crate::storage::StreakConfig;

/// How much a loss would hurt, stepped by streak length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionalWeight {
    #[default]
    Mild,
    Moderate,
    Significant,
    Devastating,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakValue {
    /// XP the streak is worth today
    pub current_value: f64,
    /// Perceived cost of losing it (loss-aversion weighted)
    pub loss_impact: f64,
    /// XP worth spending to protect it
    pub protection_worth: f64,
    pub emotional_weight: EmotionalWeight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtectionAction {
    ScheduleReminder,
    CompleteActivityNow,
    UseFreeze,
    PlanBackupActivity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtectionRecommendation {
    pub action: ProtectionAction,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakRiskAssessment {
    pub risk_level: RiskLevel,
    pub hours_until_break: f64,
    pub is_broken: bool,
    pub streak_value: StreakValue,
    /// 0.0-1.0
    pub loss_aversion_score: f64,
    pub emotional_impact: EmotionalWeight,
    pub protection_recommendations: Vec<ProtectionRecommendation>,
}

/// Analytics tag attached to a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PsychologyTrigger {
    LossAversion,
    Scarcity,
    EndowedProgress,
    Commitment,
}

impl PsychologyTrigger {
    pub fn tag(&self) -> &'static str {
        match self {
            PsychologyTrigger::LossAversion => "LOSS_AVERSION: emphasize what will be lost",
            PsychologyTrigger::Scarcity => "SCARCITY: highlight the shrinking time window",
            PsychologyTrigger::EndowedProgress => "ENDOWED_PROGRESS: remind of progress already invested",
            PsychologyTrigger::Commitment => "COMMITMENT: reinforce the user's stated goal",
        }
    }
}

impl std::fmt::Display for PsychologyTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakNotification {
    pub urgency: Urgency,
    pub title: String,
    pub message: String,
    pub psychology_triggers: Vec<PsychologyTrigger>,
}

/// Values streaks and scores how close they are to breaking.
pub struct StreakRiskEngine {
    config: StreakConfig,
}

impl StreakRiskEngine {
    pub fn new() -> Self {
        Self {
            config: StreakConfig::default(),
        }
    }

    pub fn with_config(config: StreakConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StreakConfig {
        &self.config
    }

    /// XP value of a streak of `length` periods.
    pub fn value_of_length(&self, length: u32) -> f64 {
        let c = &self.config;
        let compounding = length.saturating_sub(c.value_floor_days) as f64;
        length as f64 * c.xp_per_day * (1.0 + c.growth_rate * compounding)
    }

    pub fn emotional_weight(&self, length: u32) -> EmotionalWeight {
        let c = &self.config;
        if length >= c.devastating_weight_days {
            EmotionalWeight::Devastating
        } else if length >= c.significant_weight_days {
            EmotionalWeight::Significant
        } else if length >= c.moderate_weight_days {
            EmotionalWeight::Moderate
        } else {
            EmotionalWeight::Mild
        }
    }

    pub fn calculate_streak_value(&self, streak: &Streak) -> StreakValue {
        let current_value = self.value_of_length(streak.current_length);
        let loss_impact = current_value * self.config.loss_aversion_multiplier;
        StreakValue {
            current_value,
            loss_impact,
            protection_worth: (loss_impact * self.config.protection_share).round(),
            emotional_weight: self.emotional_weight(streak.current_length),
        }
    }

    /// Risk level for the hours left before the streak breaks.
    pub fn risk_for_hours(&self, hours_until_break: f64) -> RiskLevel {
        let c = &self.config;
        if hours_until_break < c.critical_hours {
            RiskLevel::Critical
        } else if hours_until_break < c.high_hours {
            RiskLevel::High
        } else if hours_until_break < c.moderate_hours {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }

    pub fn assess_streak_risk(&self, streak: &Streak, now: DateTime<Utc>) -> StreakRiskAssessment {
        let window = streak.streak_type.window_hours();
        let value = self.calculate_streak_value(streak);

        let hours_since = match streak.hours_since_activity(now) {
            Some(hours) if streak.current_length > 0 => hours,
            _ => {
                // Nothing to lose yet.
                return StreakRiskAssessment {
                    risk_level: RiskLevel::Low,
                    hours_until_break: window,
                    is_broken: false,
                    streak_value: value,
                    loss_aversion_score: 0.0,
                    emotional_impact: EmotionalWeight::Mild,
                    protection_recommendations: Vec::new(),
                };
            }
        };

        let hours_until_break = (window - hours_since).max(0.0);
        let risk_level = self.risk_for_hours(hours_until_break);

        let value_norm = 1.0 - (-value.current_value / 500.0).exp();
        let proximity = 1.0 - hours_until_break / window;
        let loss_aversion_score = (value_norm * (0.4 + 0.6 * proximity)).clamp(0.0, 1.0);

        let protection_recommendations = self.recommendations(streak, risk_level, hours_until_break);

        tracing::debug!(
            length = streak.current_length,
            hours_until_break,
            ?risk_level,
            "streak risk assessed"
        );

        StreakRiskAssessment {
            risk_level,
            hours_until_break,
            is_broken: streak.is_broken(now),
            emotional_impact: value.emotional_weight,
            streak_value: value,
            loss_aversion_score,
            protection_recommendations,
        }
    }

    fn recommendations(
        &self,
        streak: &Streak,
        risk: RiskLevel,
        hours_left: f64,
    ) -> Vec<ProtectionRecommendation> {
        let label = streak.length_label();
        let reminder = ProtectionRecommendation {
            action: ProtectionAction::ScheduleReminder,
            message: format!("Set a reminder so your {label} streak stays safe."),
        };
        let complete_now = ProtectionRecommendation {
            action: ProtectionAction::CompleteActivityNow,
            message: format!("Complete one qualifying activity in the next {hours_left:.0} hours."),
        };
        let fallback = if streak.freezes_remaining() > 0 {
            ProtectionRecommendation {
                action: ProtectionAction::UseFreeze,
                message: format!(
                    "Spend a streak freeze ({} left) if you can't make it today.",
                    streak.freezes_remaining()
                ),
            }
        } else {
            ProtectionRecommendation {
                action: ProtectionAction::PlanBackupActivity,
                message: "No freezes left: pick a two-minute version of your activity as a backup."
                    .to_string(),
            }
        };

        match risk {
            RiskLevel::Low => Vec::new(),
            RiskLevel::Moderate => vec![reminder],
            RiskLevel::High => vec![complete_now, reminder],
            RiskLevel::Critical => vec![complete_now, fallback, reminder],
        }
    }

    /// Build the loss-framed notification for an assessment.
    pub fn generate_loss_aversion_notification(
        &self,
        assessment: &StreakRiskAssessment,
        streak: &Streak,
    ) -> StreakNotification {
        let label = streak.length_label();
        let urgency = Urgency::from(assessment.risk_level);
        let at_stake = assessment.streak_value.current_value;
        let hours = assessment.hours_until_break;

        let (title, message, psychology_triggers) = match assessment.risk_level {
            RiskLevel::Low => (
                "Streak on track".to_string(),
                format!("Your {label} streak is safe. Keep the rhythm going."),
                vec![PsychologyTrigger::Commitment],
            ),
            RiskLevel::Moderate => (
                "Keep your streak alive".to_string(),
                format!(
                    "Your {label} streak needs attention within {hours:.0} hours. Don't let {at_stake:.0} XP of progress slip."
                ),
                vec![PsychologyTrigger::LossAversion, PsychologyTrigger::Commitment],
            ),
            RiskLevel::High => (
                "Your streak is at risk".to_string(),
                format!(
                    "Only {hours:.0} hours left to protect your {label} streak. You've invested {} {}s; don't lose them now.",
                    streak.current_length,
                    streak.streak_type.unit()
                ),
                vec![
                    PsychologyTrigger::LossAversion,
                    PsychologyTrigger::Scarcity,
                    PsychologyTrigger::EndowedProgress,
                ],
            ),
            RiskLevel::Critical => (
                "Last chance to save your streak".to_string(),
                format!(
                    "Your {label} streak ends in {hours:.1} hours! You'll lose {at_stake:.0} XP of progress unless you act now."
                ),
                vec![
                    PsychologyTrigger::LossAversion,
                    PsychologyTrigger::Scarcity,
                    PsychologyTrigger::EndowedProgress,
                    PsychologyTrigger::Commitment,
                ],
            ),
        };

        StreakNotification {
            urgency,
            title,
            message,
            psychology_triggers,
        }
    }

    pub fn calculate_recovery_options(&self, broken: &Streak, now: DateTime<Utc>) -> RecoveryOption {
        recovery::recovery_options(self, broken, now)
    }
}

impl Default for StreakRiskEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::streak::StreakType;
    use chrono::Duration;

    fn streak(length: u32, hours_ago: i64, now: DateTime<Utc>) -> Streak {
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
    fn test_emotional_weight_steps() {
        let engine = StreakRiskEngine::new();
        assert_eq!(engine.emotional_weight(5), EmotionalWeight::Mild);
        assert_eq!(engine.emotional_weight(14), EmotionalWeight::Moderate);
        assert_eq!(engine.emotional_weight(21), EmotionalWeight::Significant);
        assert_eq!(engine.emotional_weight(30), EmotionalWeight::Devastating);
    }

    #[test]
    fn test_value_grows_and_loss_doubles() {
        let engine = StreakRiskEngine::new();
        let now = Utc::now();
        let short = engine.calculate_streak_value(&streak(5, 1, now));
        let long = engine.calculate_streak_value(&streak(20, 1, now));
        assert!(long.current_value > short.current_value);
        assert!((long.loss_impact - 2.0 * long.current_value).abs() < 1e-9);
        assert!(long.protection_worth > 0.0);
    }

    #[test]
    fn test_thirty_day_streak_at_22_hours_is_critical() {
        let engine = StreakRiskEngine::new();
        let now = Utc::now();
        let assessment = engine.assess_streak_risk(&streak(30, 22, now), now);
        assert_eq!(assessment.risk_level, RiskLevel::Critical);
        assert!(assessment.hours_until_break < 3.0);
        assert_eq!(assessment.emotional_impact, EmotionalWeight::Devastating);
        assert_eq!(assessment.protection_recommendations.len(), 3);
        assert!(assessment
            .protection_recommendations
            .iter()
            .any(|r| r.action == ProtectionAction::UseFreeze));
    }

    #[test]
    fn test_risk_thresholds() {
        let engine = StreakRiskEngine::new();
        let now = Utc::now();
        assert_eq!(engine.assess_streak_risk(&streak(10, 17, now), now).risk_level, RiskLevel::High);
        assert_eq!(engine.assess_streak_risk(&streak(10, 10, now), now).risk_level, RiskLevel::Moderate);
        assert_eq!(engine.assess_streak_risk(&streak(10, 2, now), now).risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_risk_is_monotone_in_hours_left() {
        let engine = StreakRiskEngine::new();
        let mut previous = RiskLevel::Critical;
        for tenths in 0..300 {
            let risk = engine.risk_for_hours(tenths as f64 / 10.0);
            assert!(risk <= previous);
            previous = risk;
        }
    }

    #[test]
    fn test_never_active_streak_is_neutral() {
        let engine = StreakRiskEngine::new();
        let assessment = engine.assess_streak_risk(&Streak::new(StreakType::Daily, 2), Utc::now());
        assert_eq!(assessment.risk_level, RiskLevel::Low);
        assert_eq!(assessment.loss_aversion_score, 0.0);
        assert!(assessment.protection_recommendations.is_empty());
    }

    #[test]
    fn test_loss_aversion_rises_near_break() {
        let engine = StreakRiskEngine::new();
        let now = Utc::now();
        let calm = engine.assess_streak_risk(&streak(20, 2, now), now);
        let tense = engine.assess_streak_risk(&streak(20, 21, now), now);
        assert!(tense.loss_aversion_score > calm.loss_aversion_score);
    }

    #[test]
    fn test_notification_mentions_length_and_tags() {
        let engine = StreakRiskEngine::new();
        let now = Utc::now();
        let s = streak(30, 22, now);
        let assessment = engine.assess_streak_risk(&s, now);
        let notification = engine.generate_loss_aversion_notification(&assessment, &s);
        assert_eq!(notification.urgency, Urgency::Critical);
        assert!(notification.message.contains("30-day"));
        assert!(notification
            .psychology_triggers
            .contains(&PsychologyTrigger::LossAversion));
        assert_eq!(
            PsychologyTrigger::LossAversion.to_string(),
            "LOSS_AVERSION: emphasize what will be lost"
        );
    }
}
