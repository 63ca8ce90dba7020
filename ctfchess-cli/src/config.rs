//! Shared command options: ruleset selection, ratings file, RNG

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use ctfchess_core::{PositionRatings, RuleSet};

#[derive(Args, Clone, Debug)]
pub struct RuleSetArgs {
    /// Ruleset JSON file (overrides --variant)
    #[arg(long, value_name = "FILE")]
    pub ruleset: Option<PathBuf>,

    /// Built-in variant: default or bastion
    #[arg(long, default_value = "default")]
    pub variant: String,
}

impl RuleSetArgs {
    pub fn load(&self) -> Result<RuleSet> {
        if let Some(path) = &self.ruleset {
            return RuleSet::load(path)
                .with_context(|| format!("Failed to load ruleset: {}", path.display()));
        }
        match RuleSet::named(&self.variant) {
            Some(rs) => Ok(rs),
            None => bail!("Unknown variant '{}' (expected default or bastion)", self.variant),
        }
    }
}

/// Load a ratings table. A missing or unreadable file gives an empty table.
pub fn load_ratings(path: &Path) -> PositionRatings {
    if !path.exists() {
        tracing::info!("No ratings at {}, starting fresh", path.display());
        return PositionRatings::new();
    }
    match read_ratings(path) {
        Ok(ratings) => {
            tracing::info!("Loaded {} ratings from {}", ratings.len(), path.display());
            ratings
        }
        Err(e) => {
            tracing::warn!("Ignoring ratings file {}: {:#}", path.display(), e);
            PositionRatings::new()
        }
    }
}

fn read_ratings(path: &Path) -> Result<PositionRatings> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let ratings = serde_json::from_str(&content).context("Failed to parse ratings JSON")?;
    Ok(ratings)
}

pub fn save_ratings(path: &Path, ratings: &PositionRatings) -> Result<()> {
    let json = serde_json::to_string_pretty(ratings)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write ratings: {}", path.display()))?;
    tracing::info!("Saved {} ratings to {}", ratings.len(), path.display());
    Ok(())
}

/// Create RNG from seed or random
pub fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}
