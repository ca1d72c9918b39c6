use serde::{Deserialize, Serialize};

use super::UsageAnalysis;
use crate::levels::RiskLevel;
use crate::storage::WellnessConfig;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementHealth {
    #[default]
    Healthy,
    Concerning,
    Problematic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellnessMetrics {
    pub burnout_risk: RiskLevel,
    /// 0.0-1.0
    pub sustainability_score: f64,
    /// Consecutive healthy assessments
    pub wellness_streak: u32,
    /// 0.0-1.0
    pub balance_index: f64,
    pub engagement_health: EngagementHealth,
    pub intervention_needed: bool,
}

impl WellnessMetrics {
    pub fn healthy_default() -> Self {
        Self {
            burnout_risk: RiskLevel::Low,
            sustainability_score: 1.0,
            wellness_streak: 0,
            balance_index: 1.0,
            engagement_health: EngagementHealth::Healthy,
            intervention_needed: false,
        }
    }
}

/// Prior assessments kept by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WellnessHistory {
    #[serde(default)]
    pub previous: Option<WellnessMetrics>,
    /// Recent health scores, oldest first
    #[serde(default)]
    pub recent_health_scores: Vec<f64>,
}

pub(super) fn assess_wellness_metrics(
    config: &WellnessConfig,
    analysis: &UsageAnalysis,
    history: &WellnessHistory,
) -> WellnessMetrics {
    let health = analysis.health_score;
    let factors = analysis.risk_factors.len();

    let mut burnout_risk = if health < 0.4 && factors >= 2 {
        RiskLevel::Critical
    } else if health < 0.55 || (factors >= 2 && health < 0.7) {
        RiskLevel::High
    } else if health < 0.75 || factors >= 1 {
        RiskLevel::Moderate
    } else {
        RiskLevel::Low
    };
    // Recovery from a critical state is gradual.
    if let Some(previous) = &history.previous {
        if previous.burnout_risk == RiskLevel::Critical && health < 0.6 {
            burnout_risk = burnout_risk.max(RiskLevel::High);
        }
    }

    let past: Vec<f64> = history
        .recent_health_scores
        .iter()
        .copied()
        .filter(|s| s.is_finite())
        .collect();
    let trailing_mean = if past.is_empty() {
        health
    } else {
        past.iter().sum::<f64>() / past.len() as f64
    };
    let sustainability_score = (0.6 * health + 0.4 * trailing_mean).clamp(0.0, 1.0);

    let wellness_streak = if health >= 0.7 {
        history.previous.as_ref().map_or(0, |p| p.wellness_streak) + 1
    } else {
        0
    };

    let patterns = &analysis.patterns;
    let over_use = (patterns.daily_active_minutes - config.healthy_usage_minutes).max(0.0);
    let balance_index = (1.0
        - over_use / (2.0 * config.healthy_usage_minutes)
        - 0.5 * patterns.time_distribution.night)
        .clamp(0.0, 1.0);

    let engagement_health = match burnout_risk {
        RiskLevel::Critical => EngagementHealth::Problematic,
        RiskLevel::High | RiskLevel::Moderate => EngagementHealth::Concerning,
        RiskLevel::Low => EngagementHealth::Healthy,
    };

    WellnessMetrics {
        burnout_risk,
        sustainability_score,
        wellness_streak,
        balance_index,
        engagement_health,
        intervention_needed: burnout_risk.is_elevated(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wellness::{CompulsiveIndicator, RiskFactor};

    fn analysis(health: f64, factors: Vec<RiskFactor>) -> UsageAnalysis {
        UsageAnalysis {
            health_score: health,
            risk_factors: factors,
            ..UsageAnalysis::healthy_default()
        }
    }

    #[test]
    fn test_low_health_with_many_factors_is_critical() {
        let metrics = assess_wellness_metrics(
            &WellnessConfig::default(),
            &analysis(
                0.3,
                vec![
                    RiskFactor::HighDailyUsage,
                    RiskFactor::CompulsiveBehavior(CompulsiveIndicator::ExcessiveChecking),
                ],
            ),
            &WellnessHistory::default(),
        );
        assert_eq!(metrics.burnout_risk, RiskLevel::Critical);
        assert_eq!(metrics.engagement_health, EngagementHealth::Problematic);
        assert!(metrics.intervention_needed);
    }

    #[test]
    fn test_healthy_usage_is_low_risk_and_extends_streak() {
        let previous = WellnessMetrics {
            wellness_streak: 4,
            ..WellnessMetrics::healthy_default()
        };
        let metrics = assess_wellness_metrics(
            &WellnessConfig::default(),
            &analysis(0.9, Vec::new()),
            &WellnessHistory {
                previous: Some(previous),
                recent_health_scores: vec![0.85, 0.9],
            },
        );
        assert_eq!(metrics.burnout_risk, RiskLevel::Low);
        assert_eq!(metrics.engagement_health, EngagementHealth::Healthy);
        assert_eq!(metrics.wellness_streak, 5);
        assert!(!metrics.intervention_needed);
    }

    #[test]
    fn test_two_factors_under_threshold_is_high() {
        let metrics = assess_wellness_metrics(
            &WellnessConfig::default(),
            &analysis(
                0.65,
                vec![
                    RiskFactor::HighDailyUsage,
                    RiskFactor::CompulsiveBehavior(CompulsiveIndicator::MarathonSession),
                ],
            ),
            &WellnessHistory::default(),
        );
        assert_eq!(metrics.burnout_risk, RiskLevel::High);
        assert!(metrics.intervention_needed);
        assert_eq!(metrics.wellness_streak, 0);
    }

    #[test]
    fn test_critical_history_is_sticky() {
        let previous = WellnessMetrics {
            burnout_risk: RiskLevel::Critical,
            ..WellnessMetrics::healthy_default()
        };
        let metrics = assess_wellness_metrics(
            &WellnessConfig::default(),
            &analysis(0.58, Vec::new()),
            &WellnessHistory {
                previous: Some(previous),
                recent_health_scores: Vec::new(),
            },
        );
        assert_eq!(metrics.burnout_risk, RiskLevel::High);
    }
}
