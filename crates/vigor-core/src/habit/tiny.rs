//! Tiny-habit chains and celebrations.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::storage::HabitConfig;

/// Upper bound on the difficulty of a single tiny step.
pub const MAX_TINY_DIFFICULTY: u8 = 3;

const DEFAULT_ANCHORS: [&str; 3] = [
    "pour my morning coffee",
    "sit down at my desk",
    "brush my teeth",
];

const CELEBRATIONS: [&str; 4] = [
    "Say \"Yes! I did it!\"",
    "Give yourself a fist pump",
    "Smile and take a deep breath",
    "Say \"Victory!\" out loud",
];

/// Limits the plan has to fit into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitConstraints {
    /// Minutes per day the user can give the behavior
    pub available_minutes: u32,
    /// Routines that already happen reliably, used as anchors
    #[serde(default)]
    pub existing_habits: Vec<String>,
    /// Expected share of days the user follows through (0.0-1.0)
    pub consistency: f64,
    /// Personal celebration phrase, if the user has one
    #[serde(default)]
    pub preferred_celebration: Option<String>,
}

impl Default for HabitConstraints {
    fn default() -> Self {
        Self {
            available_minutes: 5,
            existing_habits: Vec::new(),
            consistency: 0.8,
            preferred_celebration: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TinyHabit {
    pub behavior: String,
    pub anchor: String,
    /// 1-3
    pub difficulty: u8,
    pub celebration: String,
}

impl TinyHabit {
    /// "After <anchor>, I will <behavior>."
    pub fn recipe(&self) -> String {
        format!("After I {}, I will {}.", self.anchor, self.behavior)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CelebrationScript {
    pub immediate: String,
    pub daily: String,
    pub weekly: String,
    pub custom: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TinyHabitPlan {
    pub target_behavior: String,
    pub tiny_habits: Vec<TinyHabit>,
    pub celebration_script: CelebrationScript,
    /// Estimated days to automaticity
    pub timeframe: u32,
}

/// Split a target like "meditate and journal" into its component behaviors.
fn components(target: &str) -> Vec<String> {
    target
        .split([',', ';'])
        .flat_map(|part| part.split(" and "))
        .flat_map(|part| part.split(" then "))
        .map(|part| part.trim().trim_end_matches('.').to_lowercase())
        .filter(|part| !part.is_empty())
        .collect()
}

/// Decompose `target_behavior` into an anchored chain of tiny steps.
pub fn create_tiny_habits(
    config: &HabitConfig,
    target_behavior: &str,
    constraints: &HabitConstraints,
) -> Result<TinyHabitPlan, ValidationError> {
    ValidationError::check_range("consistency", constraints.consistency, 0.0, 1.0)?;
    let parts = components(target_behavior);
    if parts.is_empty() {
        return Err(ValidationError::EmptyInput("target_behavior".to_string()));
    }

    let mut anchors: Vec<String> = constraints
        .existing_habits
        .iter()
        .map(|h| h.trim().to_lowercase())
        .filter(|h| !h.is_empty())
        .collect();
    if anchors.is_empty() {
        anchors = DEFAULT_ANCHORS.iter().map(|a| a.to_string()).collect();
    }

    let mut steps: Vec<(String, u8)> = Vec::new();
    for part in &parts {
        steps.push((format!("get ready to {part}"), 1));
        steps.push((format!("{part} for just two minutes"), 2));
        if constraints.available_minutes >= 10 {
            steps.push((format!("{part} for five minutes"), MAX_TINY_DIFFICULTY));
        }
    }
    steps.truncate(config.max_steps);

    let mut tiny_habits: Vec<TinyHabit> = Vec::with_capacity(steps.len());
    for (i, (behavior, difficulty)) in steps.into_iter().enumerate() {
        // Each step after the first hangs off the one before it.
        let anchor = match tiny_habits.last() {
            Some(previous) if i % 3 != 0 => previous.behavior.clone(),
            _ => anchors[(i / 3) % anchors.len()].clone(),
        };
        let celebration = constraints
            .preferred_celebration
            .clone()
            .unwrap_or_else(|| CELEBRATIONS[i % CELEBRATIONS.len()].to_string());
        tiny_habits.push(TinyHabit {
            behavior,
            anchor,
            difficulty: difficulty.min(MAX_TINY_DIFFICULTY),
            celebration,
        });
    }

    let celebration_script = CelebrationScript {
        immediate: constraints
            .preferred_celebration
            .clone()
            .unwrap_or_else(|| CELEBRATIONS[0].to_string()),
        daily: "Before bed, name one tiny win from today.".to_string(),
        weekly: "At the end of the week, look back at your chain and share your progress."
            .to_string(),
        custom: constraints.preferred_celebration.clone(),
    };

    let steps_factor = 1.0 + 0.1 * (tiny_habits.len().saturating_sub(1)) as f64;
    let days = config.base_automaticity_days * steps_factor / constraints.consistency.max(0.3);
    let timeframe = (days.ceil() as u32).clamp(config.min_automaticity_days, config.max_automaticity_days);

    tracing::debug!(steps = tiny_habits.len(), timeframe, "tiny habit plan built");

    Ok(TinyHabitPlan {
        target_behavior: target_behavior.trim().to_string(),
        tiny_habits,
        celebration_script,
        timeframe,
    })
}

/// Facts about the session that just finished.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Consecutive days the behavior has been done
    pub streak_days: u32,
    /// 1-3 for tiny steps, up to 10 for larger ones
    pub difficulty: f64,
    pub completion_seconds: f64,
    pub expected_seconds: f64,
    /// Current automaticity (0.0-1.0)
    pub habit_strength: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelUnlock {
    pub milestone_days: u32,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Celebration {
    pub celebration: String,
    /// 0.5-1.0
    pub emotional_reward: f64,
    pub habit_strength_increase: f64,
    pub next_level_unlock: Option<LevelUnlock>,
}

/// Celebrate a completed step and grow its automaticity.
pub fn celebrate_success(
    config: &HabitConfig,
    behavior: &str,
    script: &CelebrationScript,
    stats: &SessionStats,
) -> Result<Celebration, ValidationError> {
    ValidationError::check_range("difficulty", stats.difficulty, 0.0, 10.0)?;
    ValidationError::check_non_negative("completion_seconds", stats.completion_seconds)?;
    ValidationError::check_non_negative("expected_seconds", stats.expected_seconds)?;
    ValidationError::check_range("habit_strength", stats.habit_strength, 0.0, 1.0)?;

    let streak_part = 1.0 - (-(stats.streak_days as f64) / 14.0).exp();
    let ease_part = 1.0 - stats.difficulty / 10.0;
    let speed_part = if stats.completion_seconds <= 0.0 || stats.expected_seconds <= 0.0 {
        0.5
    } else {
        (stats.expected_seconds / stats.completion_seconds).clamp(0.0, 2.0) / 2.0
    };
    let emotional_reward =
        (0.5 + 0.2 * streak_part + 0.15 * ease_part + 0.15 * speed_part).clamp(0.5, 1.0);

    let habit_strength_increase =
        config.strength_rate * (1.0 - stats.habit_strength) * emotional_reward;

    let next_level_unlock = config
        .milestones
        .iter()
        .find(|&&m| m == stats.streak_days)
        .map(|&m| LevelUnlock {
            milestone_days: m,
            title: format!("{m}-day streak milestone unlocked!"),
        });

    let behavior = behavior.trim();
    let celebration = match &script.custom {
        Some(custom) => format!("{custom} You did it: {behavior}."),
        None => format!("{} You did it: {behavior}.", script.immediate),
    };

    Ok(Celebration {
        celebration,
        emotional_reward,
        habit_strength_increase,
        next_level_unlock,
    })
}
