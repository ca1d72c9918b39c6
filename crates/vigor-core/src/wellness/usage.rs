use std::collections::{BTreeSet, HashSet};

use chrono::{Datelike, Duration, Timelike};
use serde::{Deserialize, Serialize};

use super::{CompulsiveIndicator, RiskFactor, UsageRecord, UserState};
use crate::error::ValidationError;
use crate::storage::WellnessConfig;

/// Share of active minutes per part of the day (sums to 1.0 with data).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeDistribution {
    /// 05:00-12:00
    pub morning: f64,
    /// 12:00-17:00
    pub afternoon: f64,
    /// 17:00-22:00
    pub evening: f64,
    /// 22:00-05:00
    pub night: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsagePatterns {
    pub daily_active_minutes: f64,
    pub sessions_per_day: f64,
    pub average_session_length: f64,
    pub longest_session: f64,
    pub time_distribution: TimeDistribution,
    /// Total minutes per weekday, Monday first
    pub weekly_pattern: [f64; 7],
    pub compulsive_indicators: Vec<CompulsiveIndicator>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageAnalysis {
    pub patterns: UsagePatterns,
    pub risk_factors: Vec<RiskFactor>,
    /// 0.0-1.0, higher is healthier
    pub health_score: f64,
    pub recommendations: Vec<String>,
}

impl UsageAnalysis {
    /// Cold-start analysis: no usage, nothing to worry about.
    pub fn healthy_default() -> Self {
        Self {
            patterns: UsagePatterns::default(),
            risk_factors: Vec::new(),
            health_score: 1.0,
            recommendations: Vec::new(),
        }
    }
}

pub(super) fn analyze_usage_patterns(
    config: &WellnessConfig,
    records: &[UsageRecord],
    user_state: &UserState,
) -> Result<UsageAnalysis, ValidationError> {
    user_state.validate()?;
    for record in records {
        ValidationError::check_non_negative("session_minutes", record.session_minutes)?;
    }
    if records.is_empty() {
        return Ok(UsageAnalysis::healthy_default());
    }

    let days: HashSet<_> = records.iter().map(|r| r.timestamp.date_naive()).collect();
    let day_count = days.len() as f64;
    let total_minutes: f64 = records.iter().map(|r| r.session_minutes).sum();
    let longest_session = records
        .iter()
        .map(|r| r.session_minutes)
        .fold(0.0_f64, f64::max);

    let mut time_distribution = TimeDistribution::default();
    let mut weekly_pattern = [0.0; 7];
    for record in records {
        let minutes = record.session_minutes;
        match record.timestamp.hour() {
            5..=11 => time_distribution.morning += minutes,
            12..=16 => time_distribution.afternoon += minutes,
            17..=21 => time_distribution.evening += minutes,
            _ => time_distribution.night += minutes,
        }
        weekly_pattern[record.timestamp.weekday().num_days_from_monday() as usize] += minutes;
    }
    if total_minutes > 0.0 {
        time_distribution.morning /= total_minutes;
        time_distribution.afternoon /= total_minutes;
        time_distribution.evening /= total_minutes;
        time_distribution.night /= total_minutes;
    }

    let daily_active_minutes = total_minutes / day_count;
    let sessions_per_day = records.len() as f64 / day_count;

    let mut indicators: BTreeSet<CompulsiveIndicator> = records
        .iter()
        .flat_map(|r| r.compulsive_indicators.iter().copied())
        .collect();
    if sessions_per_day > config.excessive_sessions_per_day || has_checking_cluster(config, records) {
        indicators.insert(CompulsiveIndicator::ExcessiveChecking);
    }
    if longest_session > config.marathon_session_minutes {
        indicators.insert(CompulsiveIndicator::MarathonSession);
    }
    if time_distribution.night > config.late_night_share {
        indicators.insert(CompulsiveIndicator::LateNightUsage);
    }
    let compulsive_indicators: Vec<_> = indicators.into_iter().collect();

    let mut risk_factors = Vec::new();
    if daily_active_minutes >= config.heavy_usage_minutes {
        risk_factors.push(RiskFactor::HighDailyUsage);
    }
    risk_factors.extend(compulsive_indicators.iter().map(|&i| RiskFactor::CompulsiveBehavior(i)));
    if user_state.stress_level >= config.high_stress {
        risk_factors.push(RiskFactor::HighStress);
    }
    if user_state.work_life_balance <= config.poor_balance {
        risk_factors.push(RiskFactor::PoorWorkLifeBalance);
    }

    let over_use = (daily_active_minutes - config.healthy_usage_minutes).max(0.0);
    let usage_penalty = (0.4 * over_use / (2.0 * config.healthy_usage_minutes)).min(0.4);
    let indicator_penalty = (0.1 * compulsive_indicators.len() as f64).min(0.3);
    let mut health_score = 1.0
        - usage_penalty
        - indicator_penalty
        - 0.2 * user_state.stress_level
        - 0.15 * (1.0 - user_state.work_life_balance);

    let strained = daily_active_minutes >= config.heavy_usage_minutes
        || user_state.stress_level >= config.high_stress
        || user_state.work_life_balance <= config.poor_balance;
    if !compulsive_indicators.is_empty() && strained {
        health_score = health_score.min(config.degraded_health_cap);
    }
    let health_score = health_score.clamp(0.0, 1.0);

    let recommendations = risk_factors.iter().map(RiskFactor::recommendation).collect();

    tracing::debug!(
        daily_active_minutes,
        sessions_per_day,
        health_score,
        indicators = compulsive_indicators.len(),
        "usage analyzed"
    );

    Ok(UsageAnalysis {
        patterns: UsagePatterns {
            daily_active_minutes,
            sessions_per_day,
            average_session_length: total_minutes / records.len() as f64,
            longest_session,
            time_distribution,
            weekly_pattern,
            compulsive_indicators,
        },
        risk_factors,
        health_score,
        recommendations,
    })
}

/// Whether enough short sessions start within one cluster window.
fn has_checking_cluster(config: &WellnessConfig, records: &[UsageRecord]) -> bool {
    let mut starts: Vec<_> = records
        .iter()
        .filter(|r| r.session_minutes < config.short_session_minutes)
        .map(|r| r.timestamp)
        .collect();
    let size = config.checking_cluster_size;
    if starts.len() < size {
        return false;
    }
    starts.sort();
    let window = Duration::minutes(config.checking_cluster_window_minutes);
    starts.windows(size).any(|w| w[size - 1] - w[0] <= window)
}
