//! Stateless psychological primitives shared by the reward engines.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Lower edge of the near-miss band, as a fraction of the target.
const NEAR_MISS_LOWER: f64 = 0.85;
/// Urgency multiplier reached right at the target.
const NEAR_MISS_MAX_BONUS: f64 = 0.5;
/// Reward probability after a fresh reward.
const BASE_REWARD_PROBABILITY: f64 = 0.1;
const MAX_REWARD_PROBABILITY: f64 = 0.95;
const BASE_JACKPOT_SHARE: f64 = 0.05;
const MAX_JACKPOT_SHARE: f64 = 0.15;
const MEDIUM_SHARE: f64 = 0.25;

/// Outcome of comparing an achievement against its target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearMissExperience {
    pub is_near_miss: bool,
    pub distance_from_goal: f64,
    /// Achieved / target
    pub completion_ratio: f64,
    /// Motivation multiplier for the next attempt (1.0 when not a near miss)
    pub urgency_bonus: f64,
    pub message: String,
}

/// Flags a near miss when `achieved` lands in the 85-99% band of `target`.
pub fn generate_near_miss_experience(
    target: f64,
    achieved: f64,
) -> Result<NearMissExperience, ValidationError> {
    ValidationError::check_non_negative("achieved", achieved)?;
    if !target.is_finite() || target <= 0.0 {
        return Err(ValidationError::InvalidValue {
            field: "target".to_string(),
            message: "must be a positive finite number".to_string(),
        });
    }

    let ratio = achieved / target;
    let distance = (target - achieved).max(0.0);
    let is_near_miss = (NEAR_MISS_LOWER..1.0).contains(&ratio);

    let (urgency_bonus, message) = if is_near_miss {
        let closeness = (ratio - NEAR_MISS_LOWER) / (1.0 - NEAR_MISS_LOWER);
        (
            1.0 + NEAR_MISS_MAX_BONUS * closeness.max(0.1),
            format!(
                "So close! Only {} away from your goal. One more push gets you there.",
                format_amount(distance)
            ),
        )
    } else if ratio >= 1.0 {
        (1.0, "Goal reached. Nicely done.".to_string())
    } else {
        (
            1.0,
            format!("{:.0}% of the way there. Keep building.", ratio * 100.0),
        )
    };

    Ok(NearMissExperience {
        is_near_miss,
        distance_from_goal: distance,
        completion_ratio: ratio,
        urgency_bonus,
        message,
    })
}

fn format_amount(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

/// Size class of an intermittent reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardTier {
    Small,
    Medium,
    Jackpot,
}

impl RewardTier {
    /// XP multiplier callers apply for this tier.
    pub fn xp_multiplier(&self) -> f64 {
        match self {
            RewardTier::Small => 1.1,
            RewardTier::Medium => 1.5,
            RewardTier::Jackpot => 3.0,
        }
    }
}

/// One past action and whether it paid out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub action_type: String,
    pub rewarded: bool,
}

/// Result of an intermittent reward draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntermittentReward {
    pub action_type: String,
    /// Actions of this type since the last reward
    pub unrewarded_count: u32,
    pub reward_probability: f64,
    pub rewarded: bool,
    pub tier: Option<RewardTier>,
}

/// Probability of a reward after `unrewarded` dry actions.
///
/// Each dry action compounds the base hazard, so pressure builds the way a
/// variable-ratio schedule does.
pub fn reward_probability(unrewarded: u32) -> f64 {
    let p = 1.0 - (1.0 - BASE_REWARD_PROBABILITY).powi(unrewarded as i32 + 1);
    p.min(MAX_REWARD_PROBABILITY)
}

/// Draws an intermittent reward for `action_type` given its history.
///
/// `history` is ordered oldest first; only entries of the same action type count.
pub fn calculate_intermittent_reward<R: Rng + ?Sized>(
    action_type: &str,
    history: &[ActionOutcome],
    rng: &mut R,
) -> IntermittentReward {
    let unrewarded = history
        .iter()
        .rev()
        .filter(|o| o.action_type == action_type)
        .take_while(|o| !o.rewarded)
        .count() as u32;

    let probability = reward_probability(unrewarded);
    let rewarded = rng.gen::<f64>() < probability;

    let tier = if rewarded {
        let jackpot_share = (BASE_JACKPOT_SHARE + 0.01 * unrewarded as f64).min(MAX_JACKPOT_SHARE);
        let roll = rng.gen::<f64>();
        Some(if roll < jackpot_share {
            RewardTier::Jackpot
        } else if roll < jackpot_share + MEDIUM_SHARE {
            RewardTier::Medium
        } else {
            RewardTier::Small
        })
    } else {
        None
    };

    tracing::debug!(
        action_type,
        unrewarded,
        probability,
        rewarded,
        "intermittent reward draw"
    );

    IntermittentReward {
        action_type: action_type.to_string(),
        unrewarded_count: unrewarded,
        reward_probability: probability,
        rewarded,
        tier,
    }
}
