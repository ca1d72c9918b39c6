use chrono::{DateTime, Duration, Utc};
use clap::Subcommand;
use vigor_core::wellness::{ActivityType, Strictness};
use vigor_core::{CurrentUsage, JsonFileStore, SnapshotStore, UsageRecord, UserState};

use super::{engine, print_json, CliResult};

/// Days of usage history fed into each check.
const WINDOW_DAYS: i64 = 7;

#[derive(Subcommand)]
pub enum WellnessAction {
    /// Log a finished session
    Log {
        /// User id
        #[arg(long)]
        user: String,
        /// Session length in minutes
        #[arg(long)]
        minutes: f64,
        /// task_work, planning, checking, chat or other
        #[arg(long, default_value = "other")]
        activity: ActivityType,
        /// Session start (RFC 3339), defaults to now
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
    /// Analyze recent usage and emit boundaries and an intervention
    Check {
        /// User id
        #[arg(long)]
        user: String,
        /// lenient, balanced or strict; defaults to the configured strictness
        #[arg(long)]
        strictness: Option<Strictness>,
        /// Minutes used today; defaults to the logged total for today
        #[arg(long)]
        minutes_today: Option<f64>,
        /// Minutes in the current session
        #[arg(long, default_value_t = 0.0)]
        session_minutes: f64,
        /// Stress level (0-1)
        #[arg(long)]
        stress: Option<f64>,
        /// Work-life balance (0-1)
        #[arg(long)]
        balance: Option<f64>,
        /// Evaluate at this RFC 3339 time instead of now
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
}

pub fn run(action: WellnessAction) -> CliResult {
    let mut store = JsonFileStore::open()?;
    match action {
        WellnessAction::Log {
            user,
            minutes,
            activity,
            at,
        } => {
            if !minutes.is_finite() || minutes < 0.0 {
                return Err(format!("--minutes must be a non-negative number, got {minutes}").into());
            }
            let record = UsageRecord {
                timestamp: at.unwrap_or_else(Utc::now),
                session_minutes: minutes,
                activity_type: activity,
                compulsive_indicators: Vec::new(),
            };
            store.append_usage(&user, record.clone())?;

            // Older records can no longer fall inside any check window.
            if let Some(newest) = store.load_usage(&user)?.last() {
                store.prune_usage(&user, newest.timestamp - Duration::days(WINDOW_DAYS))?;
            }
            print_json(&record)
        }
        WellnessAction::Check {
            user,
            strictness,
            minutes_today,
            session_minutes,
            stress,
            balance,
            at,
        } => {
            let defaults = UserState::default();
            let user_state = UserState {
                stress_level: stress.unwrap_or(defaults.stress_level),
                work_life_balance: balance.unwrap_or(defaults.work_life_balance),
            };
            user_state.validate()?;

            let engine = engine(None)?;
            let now = at.unwrap_or_else(Utc::now);

            let since = now - Duration::days(WINDOW_DAYS);
            let records: Vec<UsageRecord> = store
                .load_usage(&user)?
                .into_iter()
                .filter(|r| r.timestamp > since && r.timestamp <= now)
                .collect();
            let today = now.date_naive();
            let logged_today: f64 = records
                .iter()
                .filter(|r| r.timestamp.date_naive() == today)
                .map(|r| r.session_minutes)
                .sum();

            let history = store.load_wellness_history(&user)?;
            let mut preferences = engine.default_preferences();
            if let Some(strictness) = strictness {
                preferences.strictness = strictness;
            }
            let usage = CurrentUsage {
                minutes_today: minutes_today.unwrap_or(logged_today),
                session_minutes,
            };
            usage.validate()?;

            let report =
                engine.try_wellness_check(&records, &user_state, &history, &preferences, &usage)?;
            store.record_wellness(&user, &report.metrics, report.analysis.health_score)?;
            print_json(&report)
        }
    }
}
