//! Variable-ratio reward scheduling for completed work.
//!
//! A bonus event is drawn with roughly 12% probability, nudged upward for
//! disengaged users and when adaptive adjustment is requested. Regular rewards
//! vary smoothly with streak length, user level and time since the last reward
//! so the payout never settles into a fixed size. The result is always clamped
//! to `[floor, ceiling] x base`.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::context::UserContext;
use crate::error::ValidationError;
use crate::storage::RewardConfig;

/// Per-call reward options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardOptions {
    /// Bias the bonus draw toward re-engagement
    #[serde(default)]
    pub adaptive_adjustment: bool,
    /// Skip the bonus draw entirely (set while a wellness limit is enforced)
    #[serde(default)]
    pub suppress_bonus: bool,
}

/// Sized reward for one completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardResult {
    pub base_xp: f64,
    /// Whole XP, unless the `[floor, ceiling] x base` band holds no integer
    pub final_xp: f64,
    pub is_bonus_event: bool,
    /// Likelihood the user keeps engaging (0.0-1.0)
    pub engagement_prediction: f64,
    /// Closeness to a sustainable variable-ratio schedule (0.0-1.0)
    pub mathematical_optimality: f64,
    pub rationale: String,
}

impl RewardResult {
    /// The unmodified base reward, issued when scoring cannot run.
    pub fn unmodified(base_xp: f64) -> Self {
        let base_xp = if base_xp.is_finite() { base_xp.max(0.0) } else { 0.0 };
        Self {
            base_xp,
            final_xp: base_xp,
            is_bonus_event: false,
            engagement_prediction: 0.5,
            mathematical_optimality: 0.0,
            rationale: format!("Earned {} XP (standard reward).", format_xp(base_xp)),
        }
    }
}

/// Sizes rewards according to a [`RewardConfig`].
pub struct RewardScheduler {
    config: RewardConfig,
}

impl RewardScheduler {
    /// Create a new scheduler with default config
    pub fn new() -> Self {
        Self {
            config: RewardConfig::default(),
        }
    }

    /// Create with custom config
    pub fn with_config(config: RewardConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RewardConfig {
        &self.config
    }

    /// Probability of a bonus event for this user.
    pub fn bonus_probability(&self, user: &UserContext, options: &RewardOptions) -> f64 {
        let c = &self.config;
        let mut p = c.bonus_probability;

        if user.recent_engagement < c.low_engagement_threshold {
            let deficit = (c.low_engagement_threshold - user.recent_engagement)
                / c.low_engagement_threshold;
            p += c.reengagement_bias * deficit;
        }
        if options.adaptive_adjustment || c.adaptive_adjustment {
            p += c.adaptive_bias;
        }

        p.clamp(c.min_bonus_probability, c.max_bonus_probability)
    }

    /// Multiplier of a regular (non-bonus) reward before jitter.
    fn regular_multiplier(&self, user: &UserContext) -> f64 {
        let c = &self.config;
        let streak = 1.0 + c.streak_bonus_cap * (1.0 - (-(user.streak_length as f64) / c.streak_scale_days).exp());
        // Each extra level adds less than the one before it.
        let level = 1.0 + c.level_bonus_cap * (1.0 - 1.0 / (1.0 + user.user_level as f64 / c.level_scale));
        let elapsed = 1.0 + c.time_bonus_cap * (1.0 - (-user.hours_since_last_reward / c.time_scale_hours).exp());
        streak * level * elapsed
    }

    /// Compute the reward for a completion worth `base_xp`.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] for a negative or non-finite `base_xp`
    /// or an out-of-range user context.
    pub fn calculate_variable_reward<R: Rng + ?Sized>(
        &self,
        base_xp: f64,
        user: &UserContext,
        options: &RewardOptions,
        rng: &mut R,
    ) -> Result<RewardResult, ValidationError> {
        ValidationError::check_non_negative("base_xp", base_xp)?;
        user.validate()?;

        let c = &self.config;
        let probability = self.bonus_probability(user, options);
        let roll: f64 = rng.gen();
        let is_bonus_event = !options.suppress_bonus && roll < probability;

        let regular = self.regular_multiplier(user);
        let multiplier = if is_bonus_event {
            rng.gen_range(c.bonus_multiplier_min..=c.bonus_multiplier_max)
        } else {
            regular * rng.gen_range((1.0 - c.jitter)..=(1.0 + c.jitter))
        };
        let multiplier = multiplier.clamp(c.floor_multiplier, c.ceiling_multiplier);

        let final_xp = whole_xp_within(
            base_xp * multiplier,
            c.floor_multiplier * base_xp,
            c.ceiling_multiplier * base_xp,
        );

        let engagement_prediction = self.engagement_prediction(user, is_bonus_event);
        let mathematical_optimality = self.optimality(probability, regular);
        let rationale = build_rationale(base_xp, final_xp, is_bonus_event, user);

        tracing::debug!(
            base_xp,
            final_xp,
            is_bonus_event,
            probability,
            "variable reward computed"
        );

        Ok(RewardResult {
            base_xp,
            final_xp,
            is_bonus_event,
            engagement_prediction,
            mathematical_optimality,
            rationale,
        })
    }

    /// Logistic blend of engagement and streak momentum.
    fn engagement_prediction(&self, user: &UserContext, bonus: bool) -> f64 {
        let momentum = 1.0 - (-(user.streak_length as f64) / 10.0).exp();
        let z = -1.5 + 3.0 * user.recent_engagement + 1.5 * momentum + if bonus { 0.3 } else { 0.0 };
        1.0 / (1.0 + (-z).exp())
    }

    /// How close the realized schedule sits to a sustainable variable ratio.
    ///
    /// Rate alignment compares the drawn bonus probability with the baseline,
    /// value alignment compares the expected multiplier with the target mean.
    /// Both are blended above a 0.82 floor.
    fn optimality(&self, probability: f64, regular: f64) -> f64 {
        let c = &self.config;
        let rate_alignment =
            1.0 - ((probability - c.bonus_probability).abs() / c.bonus_probability).min(1.0);

        let bonus_mean = (c.bonus_multiplier_min + c.bonus_multiplier_max) / 2.0;
        let expected = (1.0 - probability) * regular + probability * bonus_mean;
        let value_alignment = 1.0
            - ((expected - c.target_mean_multiplier).abs() / c.target_mean_multiplier).min(1.0);

        0.82 + 0.18 * (0.6 * rate_alignment + 0.4 * value_alignment)
    }
}

impl Default for RewardScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// Rounds `xp` to a whole number that stays inside `[lo, hi]`.
///
/// Falls back to the clamped fractional value when no integer fits.
fn whole_xp_within(xp: f64, lo: f64, hi: f64) -> f64 {
    let clamped = xp.clamp(lo, hi);
    let rounded = clamped.round();
    if (lo..=hi).contains(&rounded) {
        rounded
    } else if lo.ceil() <= hi {
        lo.ceil()
    } else {
        clamped
    }
}

/// Whole amounts print without decimals, fractional ones to two places.
pub(crate) fn format_xp(xp: f64) -> String {
    if xp.fract() == 0.0 {
        format!("{xp:.0}")
    } else {
        format!("{xp:.2}")
    }
}

fn build_rationale(base_xp: f64, final_xp: f64, bonus: bool, user: &UserContext) -> String {
    let mut parts = Vec::new();
    if bonus {
        parts.push(format!(
            "Bonus event! Earned {} XP instead of the usual {}.",
            format_xp(final_xp),
            format_xp(base_xp)
        ));
    } else {
        parts.push(format!(
            "Earned {} XP (base {}).",
            format_xp(final_xp),
            format_xp(base_xp)
        ));
    }
    if user.streak_length >= 3 {
        parts.push(format!("Your {}-day streak boosts rewards.", user.streak_length));
    }
    if user.hours_since_last_reward >= 24.0 {
        parts.push("Welcome back bonus for returning after a break.".to_string());
    }
    parts.join(" ")
}
