//! Injectable random source for the probabilistic parts of the engine.
//!
//! Reward draws and intermittent reward draws take `&mut R where R: Rng`.
//! Production code builds an [`EngineRng`] from OS entropy once, tests seed it.

use rand::rngs::OsRng;
use rand::SeedableRng;
use rand_pcg::Mcg128Xsl64;

use crate::error::ConfigError;

/// Generator used by the engine facade.
pub type EngineRng = Mcg128Xsl64;

/// Deterministic generator for reproducible draws.
pub fn seeded(seed: u64) -> EngineRng {
    Mcg128Xsl64::seed_from_u64(seed)
}

/// Generator seeded from the operating system.
///
/// # Errors
/// Returns [`ConfigError::RandomSource`] when no entropy source is available,
/// so the failure surfaces when the engine is built rather than mid-call.
pub fn from_entropy() -> Result<EngineRng, ConfigError> {
    Mcg128Xsl64::from_rng(OsRng).map_err(|e| ConfigError::RandomSource(e.to_string()))
}
