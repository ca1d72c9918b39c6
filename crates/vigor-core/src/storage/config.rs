//! TOML-based engine configuration.
//!
//! Every threshold the scoring engines rely on lives here, grouped per engine:
//! - Reward scheduling (bonus rate, multiplier band)
//! - Flow zone boundaries and difficulty tuning
//! - Streak valuation, risk hours and recovery windows
//! - Habit formation (Fogg action line, automaticity horizon)
//! - Wellness heuristics and boundary strictness
//!
//! Configuration is stored at `~/.config/vigor/engine.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;
use crate::wellness::Strictness;

/// Variable-ratio reward schedule tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Bias draws toward re-engagement on every call
    pub adaptive_adjustment: bool,
    /// Baseline probability of a bonus event
    pub bonus_probability: f64,
    /// Below this recent engagement the re-engagement bias kicks in
    pub low_engagement_threshold: f64,
    /// Extra bonus probability at zero engagement
    pub reengagement_bias: f64,
    /// Extra bonus probability when adaptive adjustment is requested
    pub adaptive_bias: f64,
    pub min_bonus_probability: f64,
    pub max_bonus_probability: f64,
    pub bonus_multiplier_min: f64,
    pub bonus_multiplier_max: f64,
    /// Final XP never drops below `floor_multiplier * base`
    pub floor_multiplier: f64,
    /// Final XP never exceeds `ceiling_multiplier * base`
    pub ceiling_multiplier: f64,
    pub streak_bonus_cap: f64,
    pub streak_scale_days: f64,
    pub level_bonus_cap: f64,
    pub level_scale: f64,
    pub time_bonus_cap: f64,
    pub time_scale_hours: f64,
    /// Half-width of the uniform jitter applied to non-bonus rewards
    pub jitter: f64,
    /// Expected multiplier a sustainable schedule aims for
    pub target_mean_multiplier: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            adaptive_adjustment: false,
            bonus_probability: 0.12,
            low_engagement_threshold: 0.3,
            reengagement_bias: 0.06,
            adaptive_bias: 0.03,
            min_bonus_probability: 0.05,
            max_bonus_probability: 0.25,
            bonus_multiplier_min: 2.0,
            bonus_multiplier_max: 3.0,
            floor_multiplier: 0.8,
            ceiling_multiplier: 3.0,
            streak_bonus_cap: 0.25,
            streak_scale_days: 14.0,
            level_bonus_cap: 0.15,
            level_scale: 10.0,
            time_bonus_cap: 0.2,
            time_scale_hours: 24.0,
            jitter: 0.1,
            target_mean_multiplier: 1.35,
        }
    }
}

/// Flow zone boundaries and difficulty calibration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    /// Ratios below this are boredom
    pub boredom_below: f64,
    /// Ratios above this are anxiety
    pub anxiety_above: f64,
    /// Challenge/skill ratio with the best flow score
    pub optimal_ratio: f64,
    pub proximity_width: f64,
    pub proximity_weight: f64,
    pub success_weight: f64,
    pub energy_weight: f64,
    /// Session length where fatigue starts to depress the score
    pub fatigue_onset_minutes: f64,
    pub fatigue_span_minutes: f64,
    /// Largest difficulty change suggested for the next task
    pub max_difficulty_step: f64,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            boredom_below: 0.9,
            anxiety_above: 1.3,
            optimal_ratio: 1.1,
            proximity_width: 0.35,
            proximity_weight: 0.6,
            success_weight: 0.2,
            energy_weight: 0.2,
            fatigue_onset_minutes: 90.0,
            fatigue_span_minutes: 240.0,
            max_difficulty_step: 1.5,
        }
    }
}

/// Streak valuation, breakage risk and recovery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreakConfig {
    /// Streak-protection budget per streak
    pub max_freezes: u32,
    pub xp_per_day: f64,
    /// Days before compounding growth starts
    pub value_floor_days: u32,
    pub growth_rate: f64,
    /// Prospect-theory weight of a loss relative to an equal gain
    pub loss_aversion_multiplier: f64,
    pub protection_share: f64,
    pub moderate_weight_days: u32,
    pub significant_weight_days: u32,
    pub devastating_weight_days: u32,
    pub critical_hours: f64,
    pub high_hours: f64,
    pub moderate_hours: f64,
    /// Pre-break length required for any recovery
    pub recovery_min_length: u32,
    /// Hours after the break during which a full recovery is offered
    pub full_recovery_grace_hours: f64,
    /// Hours after the break during which a partial recovery is offered
    pub partial_recovery_hours: f64,
    pub partial_recovery_fraction: f64,
    pub full_recovery_cost_factor: f64,
    pub partial_recovery_cost_factor: f64,
}

impl Default for StreakConfig {
    fn default() -> Self {
        Self {
            max_freezes: 2,
            xp_per_day: 10.0,
            value_floor_days: 3,
            growth_rate: 0.05,
            loss_aversion_multiplier: 2.0,
            protection_share: 0.25,
            moderate_weight_days: 14,
            significant_weight_days: 21,
            devastating_weight_days: 30,
            critical_hours: 3.0,
            high_hours: 8.0,
            moderate_hours: 16.0,
            recovery_min_length: 14,
            full_recovery_grace_hours: 1.0,
            partial_recovery_hours: 24.0,
            partial_recovery_fraction: 0.5,
            full_recovery_cost_factor: 1.5,
            partial_recovery_cost_factor: 0.75,
        }
    }
}

/// Fogg behavior model and tiny-habit planning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HabitConfig {
    /// Motivation x ability product where behavior becomes likely
    pub action_line: f64,
    pub likelihood_steepness: f64,
    /// Hours (inclusive start, exclusive end) with a motivation boost
    pub peak_hours: (u32, u32),
    pub max_steps: usize,
    /// Median days to automaticity for a single simple behavior
    pub base_automaticity_days: f64,
    pub min_automaticity_days: u32,
    pub max_automaticity_days: u32,
    pub strength_rate: f64,
    pub milestones: Vec<u32>,
}

impl Default for HabitConfig {
    fn default() -> Self {
        Self {
            action_line: 0.25,
            likelihood_steepness: 10.0,
            peak_hours: (8, 12),
            max_steps: 5,
            base_automaticity_days: 66.0,
            min_automaticity_days: 18,
            max_automaticity_days: 254,
            strength_rate: 0.05,
            milestones: vec![3, 7, 14, 21, 30, 66, 100],
        }
    }
}

/// Usage heuristics and boundary generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WellnessConfig {
    pub strictness: Strictness,
    /// Daily minutes counted as heavy usage
    pub heavy_usage_minutes: f64,
    /// Daily minutes above which health starts to drop
    pub healthy_usage_minutes: f64,
    pub excessive_sessions_per_day: f64,
    pub short_session_minutes: f64,
    pub checking_cluster_size: usize,
    pub checking_cluster_window_minutes: i64,
    pub marathon_session_minutes: f64,
    pub late_night_share: f64,
    pub high_stress: f64,
    pub poor_balance: f64,
    /// Ceiling on health score once compulsive use meets heavy load
    pub degraded_health_cap: f64,
    pub mandatory_rest_minutes: u32,
}

impl Default for WellnessConfig {
    fn default() -> Self {
        Self {
            strictness: Strictness::Balanced,
            heavy_usage_minutes: 180.0,
            healthy_usage_minutes: 120.0,
            excessive_sessions_per_day: 15.0,
            short_session_minutes: 5.0,
            checking_cluster_size: 5,
            checking_cluster_window_minutes: 60,
            marathon_session_minutes: 120.0,
            late_night_share: 0.25,
            high_stress: 0.7,
            poor_balance: 0.3,
            degraded_health_cap: 0.65,
            mandatory_rest_minutes: 30,
        }
    }
}

/// Engine configuration.
///
/// Serialized to/from TOML at `~/.config/vigor/engine.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub reward: RewardConfig,
    #[serde(default)]
    pub flow: FlowConfig,
    #[serde(default)]
    pub streak: StreakConfig,
    #[serde(default)]
    pub habit: HabitConfig,
    #[serde(default)]
    pub wellness: WellnessConfig,
}

fn invalid(key: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.into(),
    }
}

fn probability(key: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(invalid(key, format!("{value} is not a probability in (0, 1)")))
    }
}

fn positive(key: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(key, format!("{value} must be a positive number")))
    }
}

fn non_negative(key: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(key, format!("{value} must not be negative")))
    }
}

impl EngineConfig {
    /// Path of the configuration file inside the data directory.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        data_dir()
            .map(|dir| dir.join("engine.toml"))
            .map_err(|e| ConfigError::LoadFailed {
                path: PathBuf::from("engine.toml"),
                message: e.to_string(),
            })
    }

    /// Load from the default location, falling back to defaults when absent.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_toml_string()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::SaveFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Check the ordering invariants the engines depend on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let r = &self.reward;
        probability("reward.bonus_probability", r.bonus_probability)?;
        probability("reward.min_bonus_probability", r.min_bonus_probability)?;
        probability("reward.max_bonus_probability", r.max_bonus_probability)?;
        if !(r.min_bonus_probability <= r.bonus_probability
            && r.bonus_probability <= r.max_bonus_probability)
        {
            return Err(invalid(
                "reward.bonus_probability",
                "must lie between min_bonus_probability and max_bonus_probability",
            ));
        }
        if !(r.floor_multiplier > 0.0 && r.floor_multiplier < r.ceiling_multiplier) {
            return Err(invalid(
                "reward.floor_multiplier",
                "must be positive and below ceiling_multiplier",
            ));
        }
        if !(r.bonus_multiplier_min <= r.bonus_multiplier_max
            && r.bonus_multiplier_max <= r.ceiling_multiplier)
        {
            return Err(invalid(
                "reward.bonus_multiplier_max",
                "bonus band must be ordered and fit under ceiling_multiplier",
            ));
        }
        if !(r.jitter >= 0.0 && r.jitter < 1.0) {
            return Err(invalid("reward.jitter", format!("{} is not in [0, 1)", r.jitter)));
        }
        non_negative("reward.streak_bonus_cap", r.streak_bonus_cap)?;
        non_negative("reward.level_bonus_cap", r.level_bonus_cap)?;
        non_negative("reward.time_bonus_cap", r.time_bonus_cap)?;
        positive("reward.streak_scale_days", r.streak_scale_days)?;
        positive("reward.level_scale", r.level_scale)?;
        positive("reward.time_scale_hours", r.time_scale_hours)?;
        positive("reward.target_mean_multiplier", r.target_mean_multiplier)?;

        let f = &self.flow;
        if !(f.boredom_below > 0.0 && f.boredom_below < f.anxiety_above) {
            return Err(invalid(
                "flow.boredom_below",
                "must be positive and below flow.anxiety_above",
            ));
        }
        if !(f.optimal_ratio >= f.boredom_below && f.optimal_ratio <= f.anxiety_above) {
            return Err(invalid("flow.optimal_ratio", "must lie inside the flow zone"));
        }
        if f.proximity_width <= 0.0 || f.fatigue_span_minutes <= 0.0 {
            return Err(invalid("flow.proximity_width", "widths must be positive"));
        }
        // Suggested deltas are bounded by [0.5, 2 x step].
        if !(f.max_difficulty_step.is_finite() && f.max_difficulty_step >= 0.25) {
            return Err(invalid(
                "flow.max_difficulty_step",
                format!("{} is below the 0.25 minimum", f.max_difficulty_step),
            ));
        }

        let s = &self.streak;
        if !(s.critical_hours < s.high_hours && s.high_hours < s.moderate_hours) {
            return Err(invalid(
                "streak.critical_hours",
                "risk hour thresholds must be strictly increasing",
            ));
        }
        if !(s.moderate_weight_days < s.significant_weight_days
            && s.significant_weight_days < s.devastating_weight_days)
        {
            return Err(invalid(
                "streak.moderate_weight_days",
                "emotional weight steps must be strictly increasing",
            ));
        }
        if s.loss_aversion_multiplier < 1.0 {
            return Err(invalid(
                "streak.loss_aversion_multiplier",
                "losses must weigh at least as much as gains",
            ));
        }
        if !(s.full_recovery_grace_hours <= s.partial_recovery_hours) {
            return Err(invalid(
                "streak.full_recovery_grace_hours",
                "full recovery window must not exceed the partial window",
            ));
        }
        if !(s.partial_recovery_fraction > 0.0 && s.partial_recovery_fraction < 1.0) {
            return Err(invalid(
                "streak.partial_recovery_fraction",
                "must be a fraction in (0, 1)",
            ));
        }

        let h = &self.habit;
        if h.peak_hours.0 >= h.peak_hours.1 || h.peak_hours.1 > 24 {
            return Err(invalid("habit.peak_hours", "must be an increasing hour range"));
        }
        if h.max_steps == 0 {
            return Err(invalid("habit.max_steps", "must allow at least one step"));
        }
        if h.min_automaticity_days > h.max_automaticity_days {
            return Err(invalid(
                "habit.min_automaticity_days",
                "must not exceed max_automaticity_days",
            ));
        }

        let w = &self.wellness;
        positive("wellness.healthy_usage_minutes", w.healthy_usage_minutes)?;
        if w.healthy_usage_minutes > w.heavy_usage_minutes {
            return Err(invalid(
                "wellness.healthy_usage_minutes",
                "must not exceed heavy_usage_minutes",
            ));
        }
        if w.checking_cluster_size < 2 {
            return Err(invalid(
                "wellness.checking_cluster_size",
                "a cluster needs at least two sessions",
            ));
        }

        Ok(())
    }
}
