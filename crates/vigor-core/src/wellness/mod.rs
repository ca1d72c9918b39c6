//! Wellness guardian: usage analysis, burnout assessment, boundaries and interventions.
//!
//! The guardian runs on its own cadence over a rolling window of usage records.
//! When it emits an [`Intervention`], callers feed it back into the reward and
//! flow engines to suppress or reshape their next outputs.

mod boundary;
mod metrics;
mod usage;

pub use boundary::{
    ActionKind, Boundary, BoundaryPreferences, BoundaryType, CurrentUsage, Enforcement,
    Intervention, InterventionAction, InterventionType,
};
pub use metrics::{EngagementHealth, WellnessHistory, WellnessMetrics};
pub use usage::{TimeDistribution, UsageAnalysis, UsagePatterns};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::storage::WellnessConfig;

/// How firmly boundaries are drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strictness {
    Lenient,
    #[default]
    Balanced,
    Strict,
}

impl Strictness {
    pub fn rank(&self) -> u8 {
        match self {
            Strictness::Lenient => 0,
            Strictness::Balanced => 1,
            Strictness::Strict => 2,
        }
    }
}

impl std::str::FromStr for Strictness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lenient" => Ok(Strictness::Lenient),
            "balanced" => Ok(Strictness::Balanced),
            "strict" => Ok(Strictness::Strict),
            other => Err(format!(
                "unknown strictness '{other}' (use lenient|balanced|strict)"
            )),
        }
    }
}

/// What the user was doing during a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    TaskWork,
    Planning,
    Checking,
    Chat,
    #[default]
    Other,
}

impl std::str::FromStr for ActivityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "task_work" | "task" => Ok(ActivityType::TaskWork),
            "planning" => Ok(ActivityType::Planning),
            "checking" => Ok(ActivityType::Checking),
            "chat" => Ok(ActivityType::Chat),
            "other" => Ok(ActivityType::Other),
            other => Err(format!(
                "unknown activity '{other}' (use task_work|planning|checking|chat|other)"
            )),
        }
    }
}

/// Usage pattern suggestive of unhealthy engagement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompulsiveIndicator {
    ExcessiveChecking,
    MarathonSession,
    LateNightUsage,
    RewardChasing,
}

impl CompulsiveIndicator {
    pub fn description(&self) -> &'static str {
        match self {
            CompulsiveIndicator::ExcessiveChecking => "frequent short check-ins clustered together",
            CompulsiveIndicator::MarathonSession => "sessions running far past a healthy length",
            CompulsiveIndicator::LateNightUsage => "a large share of usage late at night",
            CompulsiveIndicator::RewardChasing => "returning mainly to collect rewards",
        }
    }
}

/// One session as captured by the telemetry collector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub timestamp: DateTime<Utc>,
    pub session_minutes: f64,
    #[serde(default)]
    pub activity_type: ActivityType,
    #[serde(default)]
    pub compulsive_indicators: Vec<CompulsiveIndicator>,
}

/// Caller-supplied wellbeing signals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UserState {
    /// 0.0-1.0
    pub stress_level: f64,
    /// 0.0-1.0, higher is better
    pub work_life_balance: f64,
}

impl Default for UserState {
    fn default() -> Self {
        Self {
            stress_level: 0.3,
            work_life_balance: 0.7,
        }
    }
}

impl UserState {
    pub fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::check_range("stress_level", self.stress_level, 0.0, 1.0)?;
        ValidationError::check_range("work_life_balance", self.work_life_balance, 0.0, 1.0)
    }
}

/// Contributor to a degraded health score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    HighDailyUsage,
    CompulsiveBehavior(CompulsiveIndicator),
    HighStress,
    PoorWorkLifeBalance,
}

impl RiskFactor {
    pub fn recommendation(&self) -> String {
        match self {
            RiskFactor::HighDailyUsage => {
                "Set a daily time limit and plan offline activities.".to_string()
            }
            RiskFactor::CompulsiveBehavior(indicator) => {
                format!("Watch for {}; batch check-ins at fixed times.", indicator.description())
            }
            RiskFactor::HighStress => {
                "Stress is high: schedule recovery time before adding more work.".to_string()
            }
            RiskFactor::PoorWorkLifeBalance => {
                "Protect time for rest, people and hobbies outside the app.".to_string()
            }
        }
    }
}

/// Everything one telemetry tick produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellnessReport {
    pub analysis: UsageAnalysis,
    pub metrics: WellnessMetrics,
    pub boundaries: Vec<Boundary>,
    pub intervention: Option<Intervention>,
}

impl WellnessReport {
    /// Healthy report with no intervention, used when assessment fails.
    pub fn no_intervention() -> Self {
        let analysis = UsageAnalysis::healthy_default();
        let metrics = WellnessMetrics::healthy_default();
        Self {
            analysis,
            metrics,
            boundaries: Vec::new(),
            intervention: None,
        }
    }
}

/// Wellness guardian bound to a [`WellnessConfig`].
pub struct WellnessGuardian {
    config: WellnessConfig,
}

impl WellnessGuardian {
    pub fn new() -> Self {
        Self {
            config: WellnessConfig::default(),
        }
    }

    pub fn with_config(config: WellnessConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WellnessConfig {
        &self.config
    }

    pub fn analyze_usage_patterns(
        &self,
        records: &[UsageRecord],
        user_state: &UserState,
    ) -> Result<UsageAnalysis, ValidationError> {
        usage::analyze_usage_patterns(&self.config, records, user_state)
    }

    pub fn assess_wellness_metrics(
        &self,
        analysis: &UsageAnalysis,
        history: &WellnessHistory,
    ) -> WellnessMetrics {
        metrics::assess_wellness_metrics(&self.config, analysis, history)
    }

    pub fn create_healthy_boundaries(
        &self,
        metrics: &WellnessMetrics,
        preferences: &BoundaryPreferences,
    ) -> Vec<Boundary> {
        boundary::create_healthy_boundaries(&self.config, metrics, preferences)
    }

    pub fn generate_intervention(
        &self,
        boundary: &Boundary,
        usage: &CurrentUsage,
        metrics: &WellnessMetrics,
    ) -> Intervention {
        boundary::generate_intervention(&self.config, boundary, usage, metrics)
    }

    /// Run one full tick: analyze, assess, draw boundaries, pick the intervention.
    ///
    /// The intervention is the most urgent one among boundaries that were
    /// exceeded, or any boundary at all when metrics say one is needed.
    pub fn evaluate(
        &self,
        records: &[UsageRecord],
        user_state: &UserState,
        history: &WellnessHistory,
        preferences: &BoundaryPreferences,
        usage: &CurrentUsage,
    ) -> Result<WellnessReport, ValidationError> {
        usage.validate()?;
        let analysis = self.analyze_usage_patterns(records, user_state)?;
        let metrics = self.assess_wellness_metrics(&analysis, history);
        let boundaries = self.create_healthy_boundaries(&metrics, preferences);

        let intervention = boundaries
            .iter()
            .map(|b| self.generate_intervention(b, usage, &metrics))
            .filter(|i| i.boundary_exceeded || metrics.intervention_needed)
            .max_by_key(|i| (i.urgency, i.intervention_type));

        if let Some(i) = &intervention {
            tracing::info!(urgency = ?i.urgency, kind = ?i.intervention_type, "wellness intervention emitted");
        }

        Ok(WellnessReport {
            analysis,
            metrics,
            boundaries,
            intervention,
        })
    }
}

impl Default for WellnessGuardian {
    fn default() -> Self {
        Self::new()
    }
}
