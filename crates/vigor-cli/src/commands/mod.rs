pub mod config;
pub mod flow;
pub mod habit;
pub mod reward;
pub mod streak;
pub mod wellness;

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use vigor_core::{EngagementEngine, EngineConfig};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

pub fn print_json<T: Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Read a JSON document from a file, or stdin when the path is `-`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, Box<dyn std::error::Error>> {
    let content = if path == Path::new("-") {
        std::io::read_to_string(std::io::stdin())?
    } else {
        std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {e}", path.display()))?
    };
    Ok(serde_json::from_str(&content)?)
}

/// Engine over the on-disk configuration, optionally with a fixed seed.
pub fn engine(seed: Option<u64>) -> Result<EngagementEngine, Box<dyn std::error::Error>> {
    let config = EngineConfig::load_or_default()?;
    let engine = match seed {
        Some(seed) => EngagementEngine::with_seed(config, seed)?,
        None => EngagementEngine::new(config)?,
    };
    Ok(engine)
}
