//! Streak lifecycle transitions.
//!
//! A streak is created on the first qualifying activity, grows by one for each
//! new period with activity, restarts once its window elapses, and is archived
//! by an explicit reset. Each transition returns a new snapshot for the caller
//! to persist.

use chrono::{DateTime, Datelike, Utc};

use super::risk::StreakRiskEngine;
use super::{Streak, StreakType};
use crate::error::StreakError;
use crate::storage::StreakConfig;

/// Applies lifecycle transitions to streak snapshots.
pub struct StreakTracker {
    valuer: StreakRiskEngine,
}

impl StreakTracker {
    pub fn new() -> Self {
        Self {
            valuer: StreakRiskEngine::new(),
        }
    }

    pub fn with_config(config: StreakConfig) -> Self {
        Self {
            valuer: StreakRiskEngine::with_config(config),
        }
    }

    /// A fresh, never-active streak carrying the configured freeze budget.
    pub fn start(&self, streak_type: StreakType) -> Streak {
        Streak::new(streak_type, self.valuer.config().max_freezes)
    }

    /// Record a qualifying activity at `at`.
    pub fn record_activity(&self, streak: &Streak, at: DateTime<Utc>) -> Streak {
        let mut next = streak.clone();

        match streak.last_activity {
            None => {
                next.current_length = 1;
            }
            Some(last) if at < last => {
                tracing::debug!(%at, %last, "ignoring out-of-order activity");
                return next;
            }
            Some(_) if streak.is_broken(at) => {
                tracing::info!(
                    previous_length = streak.current_length,
                    "streak window elapsed, starting over"
                );
                next.current_length = 1;
                next.protection_level = 0;
                next.freezes_used = 0;
            }
            Some(last) if same_period(streak.streak_type, last, at) => {}
            Some(_) => {
                next.current_length = streak.current_length.saturating_add(1).max(1);
            }
        }

        next.last_activity = Some(at);
        next.longest_ever = next.longest_ever.max(next.current_length);
        next.value_in_xp = self.valuer.value_of_length(next.current_length);
        next
    }

    /// Spend one freeze to restart the activity window without growing the streak.
    ///
    /// # Errors
    /// [`StreakError::NotActive`] for a never-active or broken streak,
    /// [`StreakError::FreezeBudgetExhausted`] when no freezes remain.
    pub fn apply_freeze(&self, streak: &Streak, now: DateTime<Utc>) -> Result<Streak, StreakError> {
        if streak.last_activity.is_none() || streak.current_length == 0 || streak.is_broken(now) {
            return Err(StreakError::NotActive);
        }
        if streak.freezes_used >= streak.max_freezes {
            return Err(StreakError::FreezeBudgetExhausted {
                used: streak.freezes_used,
                max: streak.max_freezes,
            });
        }

        let mut next = streak.clone();
        next.last_activity = Some(now);
        next.freezes_used += 1;
        next.protection_level += 1;

        tracing::info!(
            length = next.current_length,
            freezes_left = next.freezes_remaining(),
            "streak freeze spent"
        );
        Ok(next)
    }

    /// Archive the run and return an empty streak that remembers the record.
    pub fn reset(&self, streak: &Streak) -> Streak {
        tracing::info!(length = streak.current_length, "streak reset");
        Streak {
            longest_ever: streak.longest_ever.max(streak.current_length),
            ..Streak::new(streak.streak_type, streak.max_freezes)
        }
    }
}

impl Default for StreakTracker {
    fn default() -> Self {
        Self::new()
    }
}

fn same_period(streak_type: StreakType, a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    match streak_type {
        StreakType::Daily => a.date_naive() == b.date_naive(),
        StreakType::Weekly => a.iso_week() == b.iso_week(),
        StreakType::Monthly => a.year() == b.year() && a.month() == b.month(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_first_activity_creates_streak() {
        let tracker = StreakTracker::new();
        let streak = tracker.record_activity(&tracker.start(StreakType::Daily), at(1, 9));
        assert_eq!(streak.current_length, 1);
        assert_eq!(streak.longest_ever, 1);
        assert_eq!(streak.max_freezes, 2);
        assert!(streak.value_in_xp > 0.0);
    }

    #[test]
    fn test_same_day_does_not_increment() {
        let tracker = StreakTracker::new();
        let streak = tracker.record_activity(&tracker.start(StreakType::Daily), at(1, 9));
        let streak = tracker.record_activity(&streak, at(1, 18));
        assert_eq!(streak.current_length, 1);
        assert_eq!(streak.last_activity, Some(at(1, 18)));
    }

    #[test]
    fn test_next_day_increments_and_gap_restarts() {
        let tracker = StreakTracker::new();
        let mut streak = tracker.start(StreakType::Daily);
        for day in 1..=5 {
            streak = tracker.record_activity(&streak, at(day, 9));
        }
        assert_eq!(streak.current_length, 5);

        let restarted = tracker.record_activity(&streak, at(8, 9));
        assert_eq!(restarted.current_length, 1);
        assert_eq!(restarted.longest_ever, 5);
    }

    #[test]
    fn test_out_of_order_activity_ignored() {
        let tracker = StreakTracker::new();
        let streak = tracker.record_activity(&tracker.start(StreakType::Daily), at(2, 9));
        let same = tracker.record_activity(&streak, at(1, 9));
        assert_eq!(same, streak);
    }

    #[test]
    fn test_freeze_budget() {
        let tracker = StreakTracker::new();
        let streak = tracker.record_activity(&tracker.start(StreakType::Daily), at(1, 9));
        let now = at(1, 9) + Duration::hours(20);

        let once = tracker.apply_freeze(&streak, now).unwrap();
        assert_eq!(once.freezes_used, 1);
        assert_eq!(once.current_length, 1);
        assert_eq!(once.last_activity, Some(now));

        let twice = tracker.apply_freeze(&once, now).unwrap();
        assert_eq!(
            tracker.apply_freeze(&twice, now),
            Err(StreakError::FreezeBudgetExhausted { used: 2, max: 2 })
        );
    }

    #[test]
    fn test_freeze_rejected_for_inactive_or_broken() {
        let tracker = StreakTracker::new();
        let empty = tracker.start(StreakType::Daily);
        assert_eq!(tracker.apply_freeze(&empty, at(1, 9)), Err(StreakError::NotActive));

        let streak = tracker.record_activity(&empty, at(1, 9));
        assert_eq!(tracker.apply_freeze(&streak, at(3, 9)), Err(StreakError::NotActive));
    }

    #[test]
    fn test_reset_keeps_record() {
        let tracker = StreakTracker::new();
        let mut streak = tracker.start(StreakType::Weekly);
        streak = tracker.record_activity(&streak, at(2, 9));
        streak = tracker.record_activity(&streak, at(9, 9));
        assert_eq!(streak.current_length, 2);

        let reset = tracker.reset(&streak);
        assert_eq!(reset.current_length, 0);
        assert_eq!(reset.longest_ever, 2);
        assert!(reset.last_activity.is_none());
        assert_eq!(reset.streak_type, StreakType::Weekly);
    }
}
