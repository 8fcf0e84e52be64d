use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::warn;
use serde::Deserialize;
use serde_json::Value;

use crate::ports::{AnalysisInput, AnalysisSource};

/// On-disk wrapper around one analysis.
///
/// `analysis` is either the analysis object or the model's raw response text.
#[derive(Debug, Deserialize)]
struct Envelope {
    file_path: Option<String>,
    #[serde(default)]
    chunk: usize,
    #[serde(default)]
    analysis: Value,
}

/// Reads `*.json` analysis envelopes from a directory tree.
pub struct JsonDirSource {
    root: PathBuf,
}

impl JsonDirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn collect_json_recursive(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
        for entry in fs::read_dir(dir).with_context(|| format!("Failed to read directory {}", dir.display()))? {
            let path = entry?.path();
            if path.is_dir() {
                Self::collect_json_recursive(&path, out)?;
            } else if path.extension().is_some_and(|ext| ext == "json") {
                out.push(path);
            }
        }
        Ok(())
    }

    /// An envelope that is not even JSON is passed on as text so it shows up
    /// as a skipped file instead of failing the whole load.
    fn read_envelope(&self, path: &Path) -> Result<AnalysisInput> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file {}", path.display()))?;
        let fallback_name = path
            .strip_prefix(&self.root)
            .unwrap_or(path)
            .with_extension("")
            .display()
            .to_string();

        let envelope: Envelope = match serde_json::from_str(&content) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!("{}: not a valid envelope ({})", path.display(), e);
                return Ok(AnalysisInput::text(fallback_name, 0, content));
            }
        };

        let file_path = envelope.file_path.unwrap_or(fallback_name);
        Ok(match envelope.analysis {
            Value::String(text) => AnalysisInput::text(file_path, envelope.chunk, text),
            other => AnalysisInput::parsed(file_path, envelope.chunk, other),
        })
    }
}

impl AnalysisSource for JsonDirSource {
    fn load(&self) -> Result<Vec<AnalysisInput>> {
        if !self.root.is_dir() {
            anyhow::bail!("'{}' is not a valid directory", self.root.display());
        }
        let mut paths = Vec::new();
        Self::collect_json_recursive(&self.root, &mut paths)?;
        paths.sort();

        paths.iter().map(|p| self.read_envelope(p)).collect()
    }
}
