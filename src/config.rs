//! Engine configuration: where results are stored and how problems are
//! seeded.
//!
//! Values come from an optional JSON file, then the environment
//! (`ACCA_GAMES_DB`, `ACCA_GAMES_SEED`) overrides them.

use std::path::{Path, PathBuf};
use std::{env, fs};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::log_warn;

const ENABLE_LOGS: bool = true;

pub const DB_PATH_ENV: &str = "ACCA_GAMES_DB";
pub const SEED_ENV: &str = "ACCA_GAMES_SEED";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// SQLite file. `None` keeps everything in an in-memory database.
    pub db_path: Option<PathBuf>,
    /// Fixed seed for reproducible problem generation. `None` seeds from
    /// OS entropy.
    pub seed: Option<u64>,
}

impl EngineConfig {
    /// Read `path` if it exists, then apply environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with(path, |key| env::var(key).ok())
    }

    fn load_with(path: &Path, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let config = if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config in {}", path.display()))?
        } else {
            Self::default()
        };
        Ok(config.with_overrides(lookup))
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(path) = lookup(DB_PATH_ENV).filter(|value| !value.trim().is_empty()) {
            self.db_path = Some(PathBuf::from(path));
        }
        if let Some(raw) = lookup(SEED_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(seed) => self.seed = Some(seed),
                Err(_) => log_warn!("Ignoring invalid {}={:?}", SEED_ENV, raw),
            }
        }
        self
    }
}
