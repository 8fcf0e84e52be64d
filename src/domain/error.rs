//! Error types for turning raw analyses into records.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors raised while interpreting one file's (or chunk's) raw analysis.
///
/// Both variants are file-local: the orchestrator skips the offending file
/// and keeps going.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The payload parsed, but it is not shaped like an analysis at all.
    #[error("malformed analysis for '{file_path}': {reason}")]
    MalformedAnalysis { file_path: String, reason: String },

    /// The model response could not be parsed as JSON.
    #[error("analysis for '{file_path}' is not valid JSON: {source}")]
    InvalidJson {
        file_path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl AnalysisError {
    pub fn malformed(file_path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedAnalysis {
            file_path: file_path.into(),
            reason: reason.into(),
        }
    }

    /// True for shape errors, false for JSON syntax errors.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedAnalysis { .. })
    }

    pub fn file_path(&self) -> &str {
        match self {
            Self::MalformedAnalysis { file_path, .. } | Self::InvalidJson { file_path, .. } => {
                file_path
            }
        }
    }
}
