//! Streak valuation, breakage risk and recovery through a loss-aversion lens.
//!
//! All functions take the caller's [`Streak`] snapshot plus the current time and
//! return fresh values. The caller owns the streak record and serializes writes.

mod recovery;
mod risk;
mod tracker;

pub use recovery::{RecoveryOption, RecoveryType};
pub use risk::{
    EmotionalWeight, ProtectionAction, ProtectionRecommendation, PsychologyTrigger,
    StreakNotification, StreakRiskAssessment, StreakRiskEngine, StreakValue,
};
pub use tracker::StreakTracker;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Length of the period a streak counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakType {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl StreakType {
    /// Hours of inactivity after which the streak breaks.
    pub fn window_hours(&self) -> f64 {
        match self {
            StreakType::Daily => 24.0,
            StreakType::Weekly => 168.0,
            StreakType::Monthly => 720.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StreakType::Daily => "daily",
            StreakType::Weekly => "weekly",
            StreakType::Monthly => "monthly",
        }
    }

    fn unit(&self) -> &'static str {
        match self {
            StreakType::Daily => "day",
            StreakType::Weekly => "week",
            StreakType::Monthly => "month",
        }
    }
}

impl std::str::FromStr for StreakType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(StreakType::Daily),
            "weekly" => Ok(StreakType::Weekly),
            "monthly" => Ok(StreakType::Monthly),
            other => Err(format!("unknown streak type '{other}' (use daily|weekly|monthly)")),
        }
    }
}

/// Snapshot of a streak as persisted by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Streak {
    pub current_length: u32,
    pub longest_ever: u32,
    /// `None` until the first qualifying activity
    pub last_activity: Option<DateTime<Utc>>,
    pub streak_type: StreakType,
    pub value_in_xp: f64,
    /// Freezes applied during the current run
    pub protection_level: u32,
    pub freezes_used: u32,
    pub max_freezes: u32,
}

impl Streak {
    /// A never-active streak.
    pub fn new(streak_type: StreakType, max_freezes: u32) -> Self {
        Self {
            current_length: 0,
            longest_ever: 0,
            last_activity: None,
            streak_type,
            value_in_xp: 0.0,
            protection_level: 0,
            freezes_used: 0,
            max_freezes,
        }
    }

    /// Hours elapsed since the last activity, if any. Never negative.
    pub fn hours_since_activity(&self, now: DateTime<Utc>) -> Option<f64> {
        self.last_activity
            .map(|last| ((now - last).num_seconds() as f64 / 3600.0).max(0.0))
    }

    /// Whether the activity window has elapsed.
    pub fn is_broken(&self, now: DateTime<Utc>) -> bool {
        self.current_length > 0
            && self
                .hours_since_activity(now)
                .is_some_and(|h| h > self.streak_type.window_hours())
    }

    pub fn freezes_remaining(&self) -> u32 {
        self.max_freezes.saturating_sub(self.freezes_used)
    }

    /// "14-day" / "3-week" style label.
    pub fn length_label(&self) -> String {
        format!("{}-{}", self.current_length, self.streak_type.unit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_window_hours() {
        assert_eq!(StreakType::Daily.window_hours(), 24.0);
        assert_eq!(StreakType::Weekly.window_hours(), 168.0);
    }

    #[test]
    fn test_is_broken_after_window() {
        let now = Utc::now();
        let mut streak = Streak::new(StreakType::Daily, 2);
        assert!(!streak.is_broken(now));

        streak.current_length = 5;
        streak.last_activity = Some(now - Duration::hours(20));
        assert!(!streak.is_broken(now));

        streak.last_activity = Some(now - Duration::hours(25));
        assert!(streak.is_broken(now));
    }

    #[test]
    fn test_streak_type_parse() {
        assert_eq!("Weekly".parse::<StreakType>().unwrap(), StreakType::Weekly);
        assert!("hourly".parse::<StreakType>().is_err());
    }

    #[test]
    fn test_length_label() {
        let mut streak = Streak::new(StreakType::Daily, 0);
        streak.current_length = 14;
        assert_eq!(streak.length_label(), "14-day");
    }
}
