use std::path::Path;

use crate::api::dto::GraphSnapshot;
use crate::domain::error::AnalysisError;
use crate::domain::raw::RawAnalysis;

/// One file's (or one chunk's) analysis as handed over by the analyzer.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisInput {
    pub file_path: String,
    /// Chunk index within the file, 0 for unchunked files
    pub chunk: usize,
    pub payload: AnalysisPayload,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisPayload {
    /// Already-parsed JSON
    Parsed(RawAnalysis),
    /// Unparsed model response text
    Text(String),
}

impl AnalysisInput {
    pub fn parsed(file_path: impl Into<String>, chunk: usize, raw: impl Into<RawAnalysis>) -> Self {
        Self {
            file_path: file_path.into(),
            chunk,
            payload: AnalysisPayload::Parsed(raw.into()),
        }
    }

    pub fn text(file_path: impl Into<String>, chunk: usize, response: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            chunk,
            payload: AnalysisPayload::Text(response.into()),
        }
    }

    pub fn raw(&self) -> Result<RawAnalysis, AnalysisError> {
        match &self.payload {
            AnalysisPayload::Parsed(raw) => Ok(raw.clone()),
            AnalysisPayload::Text(text) => RawAnalysis::from_model_response(&self.file_path, text),
        }
    }
}

/// Supplies the raw analyses to ingest.
pub trait AnalysisSource {
    fn load(&self) -> anyhow::Result<Vec<AnalysisInput>>;
}

impl AnalysisSource for Vec<AnalysisInput> {
    fn load(&self) -> anyhow::Result<Vec<AnalysisInput>> {
        Ok(self.clone())
    }
}

/// Persists graph snapshots.
pub trait SnapshotExporter {
    fn export(&self, snapshot: &GraphSnapshot, path: &Path) -> anyhow::Result<()>;
}
