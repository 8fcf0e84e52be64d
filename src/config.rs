//! Run configuration, read from TOML.
//!
//! ```toml
//! max_path_length = 32
//! conventional_entry_names = false
//! workers = 4
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::entry_point::EntryPointDetector;
use crate::domain::normalizer::Normalizer;
use crate::domain::paths::DEFAULT_MAX_PATH_LENGTH;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GraphConfig {
    /// Maximum nodes per execution path
    pub max_path_length: usize,
    /// Flag `main`-like functions in files that declare no entry points
    pub conventional_entry_names: bool,
    /// Normalization workers; `None` picks half the cores
    pub workers: Option<usize>,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            max_path_length: DEFAULT_MAX_PATH_LENGTH,
            conventional_entry_names: true,
            workers: None,
        }
    }
}

impl GraphConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut config: GraphConfig = toml::from_str(content).context("Invalid graph config")?;
        config.max_path_length = config.max_path_length.max(1);
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("In {}", path.display()))
    }

    /// Normalizer with the heuristics this config enables.
    pub fn normalizer(&self) -> Normalizer {
        let detector = if self.conventional_entry_names {
            EntryPointDetector::with_defaults()
        } else {
            EntryPointDetector::declared_only()
        };
        Normalizer::new(detector)
    }
}
