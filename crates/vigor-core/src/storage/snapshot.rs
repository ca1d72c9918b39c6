//! Per-user snapshot persistence.
//!
//! The engines are stateless; callers that want to keep streaks, usage
//! records and the last wellness assessment between runs go through a
//! [`SnapshotStore`]. [`JsonFileStore`] keeps one JSON document per user.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{Result, ValidationError};
use crate::streak::{Streak, StreakType};
use crate::wellness::{UsageRecord, WellnessHistory, WellnessMetrics};

/// Health scores kept for the sustainability trailing mean.
pub const HEALTH_HISTORY_LEN: usize = 14;

/// Everything persisted for one user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserSnapshot {
    #[serde(default)]
    pub streaks: Vec<Streak>,
    #[serde(default)]
    pub usage: Vec<UsageRecord>,
    #[serde(default)]
    pub wellness: Option<WellnessMetrics>,
    /// Health scores of past assessments, oldest first
    #[serde(default)]
    pub health_scores: Vec<f64>,
}

impl UserSnapshot {
    pub fn streak(&self, streak_type: StreakType) -> Option<&Streak> {
        self.streaks.iter().find(|s| s.streak_type == streak_type)
    }

    /// Insert or replace the streak of the same type.
    pub fn put_streak(&mut self, streak: Streak) {
        match self
            .streaks
            .iter_mut()
            .find(|s| s.streak_type == streak.streak_type)
        {
            Some(slot) => *slot = streak,
            None => self.streaks.push(streak),
        }
    }
}

/// Storage for user snapshots.
pub trait SnapshotStore {
    fn load(&self, user: &str) -> Result<UserSnapshot>;

    fn save(&mut self, user: &str, snapshot: &UserSnapshot) -> Result<()>;

    fn load_streak(&self, user: &str, streak_type: StreakType) -> Result<Option<Streak>> {
        Ok(self.load(user)?.streak(streak_type).cloned())
    }

    fn save_streak(&mut self, user: &str, streak: &Streak) -> Result<()> {
        let mut snapshot = self.load(user)?;
        snapshot.put_streak(streak.clone());
        self.save(user, &snapshot)
    }

    fn load_usage(&self, user: &str) -> Result<Vec<UsageRecord>> {
        Ok(self.load(user)?.usage)
    }

    /// Append a record, keeping records ordered by timestamp.
    fn append_usage(&mut self, user: &str, record: UsageRecord) -> Result<()> {
        let mut snapshot = self.load(user)?;
        snapshot.usage.push(record);
        snapshot.usage.sort_by_key(|r| r.timestamp);
        self.save(user, &snapshot)
    }

    /// Drop usage records older than `before`, returning how many went.
    fn prune_usage(&mut self, user: &str, before: DateTime<Utc>) -> Result<usize> {
        let mut snapshot = self.load(user)?;
        let len = snapshot.usage.len();
        snapshot.usage.retain(|r| r.timestamp >= before);
        let removed = len - snapshot.usage.len();
        if removed > 0 {
            self.save(user, &snapshot)?;
            tracing::debug!(user, removed, "usage records pruned");
        }
        Ok(removed)
    }

    fn load_wellness(&self, user: &str) -> Result<Option<WellnessMetrics>> {
        Ok(self.load(user)?.wellness)
    }

    /// Last assessment and trailing health scores, ready for the guardian.
    fn load_wellness_history(&self, user: &str) -> Result<WellnessHistory> {
        let snapshot = self.load(user)?;
        Ok(WellnessHistory {
            previous: snapshot.wellness,
            recent_health_scores: snapshot.health_scores,
        })
    }

    /// Store the latest assessment and push its health score, keeping the
    /// last [`HEALTH_HISTORY_LEN`] scores.
    fn record_wellness(
        &mut self,
        user: &str,
        metrics: &WellnessMetrics,
        health_score: f64,
    ) -> Result<()> {
        let mut snapshot = self.load(user)?;
        snapshot.wellness = Some(metrics.clone());
        snapshot.health_scores.push(health_score);
        let excess = snapshot.health_scores.len().saturating_sub(HEALTH_HISTORY_LEN);
        snapshot.health_scores.drain(..excess);
        self.save(user, &snapshot)
    }
}

fn check_user(user: &str) -> std::result::Result<(), ValidationError> {
    if user.is_empty() {
        return Err(ValidationError::EmptyInput("user".to_string()));
    }
    if !user
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
        || user.starts_with('.')
    {
        return Err(ValidationError::InvalidValue {
            field: "user".to_string(),
            message: format!("'{user}' may only contain letters, digits, '-', '_' and '.'"),
        });
    }
    Ok(())
}

/// In-memory store, mostly for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: HashMap<String, UserSnapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self, user: &str) -> Result<UserSnapshot> {
        check_user(user)?;
        Ok(self.users.get(user).cloned().unwrap_or_default())
    }

    fn save(&mut self, user: &str, snapshot: &UserSnapshot) -> Result<()> {
        check_user(user)?;
        self.users.insert(user.to_string(), snapshot.clone());
        Ok(())
    }
}

/// Directory of `<user>.json` snapshot files.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open the store under `<data_dir>/users`.
    pub fn open() -> Result<Self> {
        let dir = data_dir()?.join("users");
        Self::with_dir(dir)
    }

    pub fn with_dir(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, user: &str) -> PathBuf {
        self.dir.join(format!("{user}.json"))
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self, user: &str) -> Result<UserSnapshot> {
        check_user(user)?;
        let path = self.path_for(user);
        if !path.exists() {
            return Ok(UserSnapshot::default());
        }
        let content = std::fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&mut self, user: &str, snapshot: &UserSnapshot) -> Result<()> {
        check_user(user)?;
        let content = serde_json::to_string_pretty(snapshot)?;
        // Write then rename so a crash never leaves a truncated snapshot.
        let path = self.path_for(user);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &path)?;
        tracing::debug!(user, path = %path.display(), "snapshot saved");
        Ok(())
    }
}
