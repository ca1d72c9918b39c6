use serde::{Deserialize, Serialize};

use super::{Strictness, WellnessMetrics};
use crate::error::ValidationError;
use crate::levels::{RiskLevel, Urgency};
use crate::storage::WellnessConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryType {
    /// Cap on minutes per day
    TimeLimit,
    /// Break after a continuous session
    SessionBreak,
    /// Enforced rest once daily usage passes the threshold
    MandatoryRest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Enforcement {
    Soft,
    Medium,
    Hard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    pub boundary_type: BoundaryType,
    /// Minutes of usage at which the boundary applies
    pub threshold: f64,
    pub enforcement: Enforcement,
    pub user_overridable: bool,
    pub description: String,
}

/// User preferences for boundary generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundaryPreferences {
    #[serde(default)]
    pub strictness: Strictness,
    /// Overrides the strictness-based daily limit
    #[serde(default)]
    pub daily_limit_minutes: Option<f64>,
    /// Overrides the strictness-based session length
    #[serde(default)]
    pub session_limit_minutes: Option<f64>,
}

/// Usage so far, as seen by the UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentUsage {
    pub minutes_today: f64,
    pub session_minutes: f64,
}

impl CurrentUsage {
    pub fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::check_non_negative("minutes_today", self.minutes_today)?;
        ValidationError::check_non_negative("session_minutes", self.session_minutes)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterventionType {
    GentleNudge,
    LimitEnforcement,
    MandatoryBreak,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    TakeBreak,
    StretchAndHydrate,
    EndSession,
    PauseRewards,
    ReviewGoals,
    Snooze,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterventionAction {
    pub action: ActionKind,
    pub label: String,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intervention {
    pub urgency: Urgency,
    pub intervention_type: InterventionType,
    pub boundary_type: BoundaryType,
    pub boundary_exceeded: bool,
    pub message: String,
    pub actions: Vec<InterventionAction>,
}

impl Intervention {
    /// Whether the UI must stop issuing rewards until the user rests.
    pub fn blocks_rewards(&self) -> bool {
        self.intervention_type == InterventionType::MandatoryBreak
    }
}

fn enforcement_for(risk: RiskLevel, strictness: Strictness) -> Enforcement {
    match risk.rank() + strictness.rank() {
        0..=1 => Enforcement::Soft,
        2..=3 => Enforcement::Medium,
        _ => Enforcement::Hard,
    }
}

fn risk_scale(risk: RiskLevel) -> f64 {
    match risk {
        RiskLevel::Low => 1.0,
        RiskLevel::Moderate => 0.9,
        RiskLevel::High => 0.75,
        RiskLevel::Critical => 0.6,
    }
}

/// Boundaries for the current wellness state.
///
/// A time limit and a session break are always present; a mandatory rest is
/// added once burnout risk is high.
pub(super) fn create_healthy_boundaries(
    config: &WellnessConfig,
    metrics: &WellnessMetrics,
    preferences: &BoundaryPreferences,
) -> Vec<Boundary> {
    let risk = metrics.burnout_risk;
    let strictness = preferences.strictness;
    let enforcement = enforcement_for(risk, strictness);
    let scale = risk_scale(risk);

    let daily = preferences
        .daily_limit_minutes
        .filter(|m| m.is_finite() && *m > 0.0)
        .unwrap_or(match strictness {
            Strictness::Lenient => 240.0,
            Strictness::Balanced => 180.0,
            Strictness::Strict => 120.0,
        });
    let session = preferences
        .session_limit_minutes
        .filter(|m| m.is_finite() && *m > 0.0)
        .unwrap_or(match strictness {
            Strictness::Lenient => 60.0,
            Strictness::Balanced => 50.0,
            Strictness::Strict => 40.0,
        });

    let daily_threshold = (daily * scale).round();
    let session_threshold = (session * scale).round();

    let mut boundaries = vec![
        Boundary {
            boundary_type: BoundaryType::TimeLimit,
            threshold: daily_threshold,
            enforcement,
            user_overridable: enforcement != Enforcement::Hard,
            description: format!("Limit daily use to {daily_threshold:.0} minutes."),
        },
        Boundary {
            boundary_type: BoundaryType::SessionBreak,
            threshold: session_threshold,
            enforcement,
            user_overridable: enforcement != Enforcement::Hard,
            description: format!("Take a break after {session_threshold:.0} minutes in one session."),
        },
    ];

    if risk.is_elevated() {
        let rest_enforcement = if risk == RiskLevel::Critical {
            Enforcement::Hard
        } else {
            enforcement.max(Enforcement::Medium)
        };
        let rest_threshold = (daily_threshold * 0.75).round();
        boundaries.push(Boundary {
            boundary_type: BoundaryType::MandatoryRest,
            threshold: rest_threshold,
            enforcement: rest_enforcement,
            user_overridable: false,
            description: format!(
                "After {rest_threshold:.0} minutes today, rest for at least {} minutes.",
                config.mandatory_rest_minutes
            ),
        });
    }

    boundaries
}

/// Intervention for one boundary given current usage.
pub(super) fn generate_intervention(
    config: &WellnessConfig,
    boundary: &Boundary,
    usage: &CurrentUsage,
    metrics: &WellnessMetrics,
) -> Intervention {
    let observed = match boundary.boundary_type {
        BoundaryType::SessionBreak => usage.session_minutes,
        BoundaryType::TimeLimit | BoundaryType::MandatoryRest => usage.minutes_today,
    };
    let exceeded = observed >= boundary.threshold;
    let approaching = observed >= 0.8 * boundary.threshold;
    let risk = metrics.burnout_risk;

    let urgency = match (exceeded, risk) {
        (true, RiskLevel::Critical) => Urgency::Critical,
        (true, RiskLevel::High) => Urgency::High,
        (true, _) => Urgency::Medium,
        (false, r) if r.is_elevated() && approaching => Urgency::Medium,
        _ => Urgency::Low,
    };

    let intervention_type = if !exceeded {
        InterventionType::GentleNudge
    } else if boundary.enforcement == Enforcement::Hard
        || boundary.boundary_type == BoundaryType::MandatoryRest
        || urgency == Urgency::Critical
    {
        InterventionType::MandatoryBreak
    } else {
        InterventionType::LimitEnforcement
    };

    let must_act = exceeded && (boundary.enforcement == Enforcement::Hard || urgency >= Urgency::High);

    let message = match intervention_type {
        InterventionType::GentleNudge => format!(
            "You've used {observed:.0} of {:.0} minutes. A short pause now keeps you fresh.",
            boundary.threshold
        ),
        InterventionType::LimitEnforcement => format!(
            "You've reached your {:.0}-minute limit. Time to step away for a bit.",
            boundary.threshold
        ),
        InterventionType::MandatoryBreak => format!(
            "You've gone past {:.0} minutes. Rest for {} minutes before continuing; rewards are paused until then.",
            boundary.threshold, config.mandatory_rest_minutes
        ),
    };

    let mut actions = vec![InterventionAction {
        action: ActionKind::TakeBreak,
        label: format!("Take a {}-minute break", config.mandatory_rest_minutes.min(15)),
        required: must_act,
    }];
    match intervention_type {
        InterventionType::GentleNudge => {
            actions.push(InterventionAction {
                action: ActionKind::StretchAndHydrate,
                label: "Stretch and drink some water".to_string(),
                required: false,
            });
            actions.push(InterventionAction {
                action: ActionKind::Snooze,
                label: "Remind me in 10 minutes".to_string(),
                required: false,
            });
        }
        InterventionType::LimitEnforcement => {
            actions.push(InterventionAction {
                action: ActionKind::EndSession,
                label: "End this session".to_string(),
                required: false,
            });
            actions.push(InterventionAction {
                action: ActionKind::ReviewGoals,
                label: "Review today's goals".to_string(),
                required: false,
            });
        }
        InterventionType::MandatoryBreak => {
            actions.push(InterventionAction {
                action: ActionKind::PauseRewards,
                label: "Pause rewards until the break is done".to_string(),
                required: true,
            });
            actions.push(InterventionAction {
                action: ActionKind::EndSession,
                label: "End this session".to_string(),
                required: boundary.enforcement == Enforcement::Hard,
            });
        }
    }

    Intervention {
        urgency,
        intervention_type,
        boundary_type: boundary.boundary_type,
        boundary_exceeded: exceeded,
        message,
        actions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(risk: RiskLevel) -> WellnessMetrics {
        WellnessMetrics {
            burnout_risk: risk,
            intervention_needed: risk.is_elevated(),
            ..WellnessMetrics::healthy_default()
        }
    }

    #[test]
    fn test_always_time_limit_and_session_break() {
        let boundaries = create_healthy_boundaries(
            &WellnessConfig::default(),
            &metrics(RiskLevel::Low),
            &BoundaryPreferences::default(),
        );
        assert_eq!(boundaries.len(), 2);
        assert_eq!(boundaries[0].boundary_type, BoundaryType::TimeLimit);
        assert_eq!(boundaries[1].boundary_type, BoundaryType::SessionBreak);
        assert_eq!(boundaries[0].threshold, 180.0);
        assert_eq!(boundaries[0].enforcement, Enforcement::Soft);
        assert!(boundaries[0].user_overridable);
    }

    #[test]
    fn test_high_burnout_adds_mandatory_rest() {
        let boundaries = create_healthy_boundaries(
            &WellnessConfig::default(),
            &metrics(RiskLevel::High),
            &BoundaryPreferences::default(),
        );
        let rest = boundaries
            .iter()
            .find(|b| b.boundary_type == BoundaryType::MandatoryRest)
            .unwrap();
        assert!(!rest.user_overridable);
        assert!(rest.enforcement >= Enforcement::Medium);
        assert!(boundaries[0].threshold < 180.0);
    }

    #[test]
    fn test_enforcement_scales_with_risk_and_strictness() {
        let config = WellnessConfig::default();
        let strict = BoundaryPreferences {
            strictness: Strictness::Strict,
            ..Default::default()
        };
        let lenient = BoundaryPreferences {
            strictness: Strictness::Lenient,
            ..Default::default()
        };
        let high_strict = create_healthy_boundaries(&config, &metrics(RiskLevel::High), &strict);
        let high_lenient = create_healthy_boundaries(&config, &metrics(RiskLevel::High), &lenient);
        let low_strict = create_healthy_boundaries(&config, &metrics(RiskLevel::Low), &strict);

        assert_eq!(high_strict[0].enforcement, Enforcement::Hard);
        assert!(!high_strict[0].user_overridable);
        assert_eq!(high_lenient[0].enforcement, Enforcement::Medium);
        assert_eq!(low_strict[0].enforcement, Enforcement::Medium);
        assert!(high_strict[0].threshold < high_lenient[0].threshold);
    }

    #[test]
    fn test_preferred_limits_override_defaults() {
        let boundaries = create_healthy_boundaries(
            &WellnessConfig::default(),
            &metrics(RiskLevel::Low),
            &BoundaryPreferences {
                daily_limit_minutes: Some(90.0),
                session_limit_minutes: Some(25.0),
                ..Default::default()
            },
        );
        assert_eq!(boundaries[0].threshold, 90.0);
        assert_eq!(boundaries[1].threshold, 25.0);
    }

    #[test]
    fn test_high_burnout_exceeded_is_high_urgency_with_required_action() {
        let config = WellnessConfig::default();
        let m = metrics(RiskLevel::High);
        let boundaries = create_healthy_boundaries(&config, &m, &BoundaryPreferences::default());
        let time_limit = &boundaries[0];
        let intervention = generate_intervention(
            &config,
            time_limit,
            &CurrentUsage {
                minutes_today: 200.0,
                session_minutes: 30.0,
            },
            &m,
        );
        assert_eq!(intervention.urgency, Urgency::High);
        assert!(intervention.boundary_exceeded);
        assert_eq!(intervention.intervention_type, InterventionType::LimitEnforcement);
        assert!(intervention.actions.iter().any(|a| a.required));
    }

    #[test]
    fn test_under_threshold_is_gentle_nudge() {
        let config = WellnessConfig::default();
        let m = metrics(RiskLevel::Low);
        let boundaries = create_healthy_boundaries(&config, &m, &BoundaryPreferences::default());
        let intervention = generate_intervention(
            &config,
            &boundaries[1],
            &CurrentUsage {
                minutes_today: 60.0,
                session_minutes: 10.0,
            },
            &m,
        );
        assert_eq!(intervention.urgency, Urgency::Low);
        assert_eq!(intervention.intervention_type, InterventionType::GentleNudge);
        assert!(intervention.actions.iter().all(|a| !a.required));
    }

    #[test]
    fn test_hard_boundary_exceeded_is_mandatory_break() {
        let config = WellnessConfig::default();
        let m = metrics(RiskLevel::Critical);
        let boundaries = create_healthy_boundaries(&config, &m, &BoundaryPreferences::default());
        assert_eq!(boundaries[0].enforcement, Enforcement::Hard);
        let intervention = generate_intervention(
            &config,
            &boundaries[0],
            &CurrentUsage {
                minutes_today: 500.0,
                session_minutes: 10.0,
            },
            &m,
        );
        assert_eq!(intervention.urgency, Urgency::Critical);
        assert_eq!(intervention.intervention_type, InterventionType::MandatoryBreak);
        assert!(intervention.blocks_rewards());
        assert!(intervention
            .actions
            .iter()
            .any(|a| a.action == ActionKind::PauseRewards && a.required));
    }
}
