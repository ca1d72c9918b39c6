use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use serde::Serialize;
use vigor_core::streak::{StreakNotification, StreakValue};
use vigor_core::{JsonFileStore, SnapshotStore, Streak, StreakRiskAssessment, StreakType};

use super::{engine, print_json, CliResult};

#[derive(Args)]
pub struct StreakTarget {
    /// User id
    #[arg(long)]
    user: String,
    /// Streak period: daily, weekly or monthly
    #[arg(long = "type", default_value = "daily")]
    streak_type: StreakType,
    /// Evaluate at this RFC 3339 time instead of now
    #[arg(long)]
    at: Option<DateTime<Utc>>,
}

#[derive(Subcommand)]
pub enum StreakAction {
    /// Record a qualifying activity
    Record(StreakTarget),
    /// Show value, risk and notification for a streak
    Status(StreakTarget),
    /// Spend a freeze to protect the streak
    Freeze(StreakTarget),
    /// Show recovery terms for a broken streak
    Recover(StreakTarget),
    /// Archive the current run and start over
    Reset(StreakTarget),
}

#[derive(Serialize)]
struct StreakStatus {
    streak: Streak,
    value: StreakValue,
    assessment: StreakRiskAssessment,
    notification: StreakNotification,
}

pub fn run(action: StreakAction) -> CliResult {
    let engine = engine(None)?;
    let mut store = JsonFileStore::open()?;

    let load = |store: &JsonFileStore, target: &StreakTarget| -> Result<Streak, Box<dyn std::error::Error>> {
        Ok(store
            .load_streak(&target.user, target.streak_type)?
            .unwrap_or_else(|| engine.start_streak(target.streak_type)))
    };

    match action {
        StreakAction::Record(target) => {
            let now = target.at.unwrap_or_else(Utc::now);
            let next = engine.record_activity(&load(&store, &target)?, now);
            store.save_streak(&target.user, &next)?;
            print_json(&next)
        }
        StreakAction::Status(target) => {
            let now = target.at.unwrap_or_else(Utc::now);
            let streak = load(&store, &target)?;
            let assessment = engine.assess_streak_risk(&streak, now);
            let notification = engine.generate_loss_aversion_notification(&assessment, &streak);
            print_json(&StreakStatus {
                value: engine.calculate_streak_value(&streak),
                streak,
                assessment,
                notification,
            })
        }
        StreakAction::Freeze(target) => {
            let now = target.at.unwrap_or_else(Utc::now);
            let next = engine.apply_freeze(&load(&store, &target)?, now)?;
            store.save_streak(&target.user, &next)?;
            print_json(&next)
        }
        StreakAction::Recover(target) => {
            let now = target.at.unwrap_or_else(Utc::now);
            let option = engine.calculate_recovery_options(&load(&store, &target)?, now);
            print_json(&option)
        }
        StreakAction::Reset(target) => {
            let next = engine.reset_streak(&load(&store, &target)?);
            store.save_streak(&target.user, &next)?;
            print_json(&next)
        }
    }
}
