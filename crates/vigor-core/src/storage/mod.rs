mod config;
pub mod snapshot;

pub use config::{EngineConfig, FlowConfig, HabitConfig, RewardConfig, StreakConfig, WellnessConfig};
pub use snapshot::{JsonFileStore, MemoryStore, SnapshotStore, UserSnapshot};

use std::path::PathBuf;

/// Returns the Vigor data directory.
///
/// `VIGOR_DATA_DIR` wins when set; otherwise `~/.config/vigor[-dev]/` based on
/// `VIGOR_ENV` (set `VIGOR_ENV=dev` to use the development directory).
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("VIGOR_DATA_DIR") {
        Some(explicit) => PathBuf::from(explicit),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("VIGOR_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("vigor-dev")
            } else {
                base_dir.join("vigor")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
