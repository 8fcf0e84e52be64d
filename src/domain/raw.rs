//! Untrusted analysis payloads as they arrive from the code-analysis model.
//!
//! Nothing here is validated beyond "is it JSON"; the normalizer is the only
//! place that interprets the shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::error::{AnalysisError, Result};

/// Top-level keys an analysis payload may carry.
pub const RECOGNIZED_KEYS: [&str; 4] = ["functions", "dependencies", "entry_points", "summary"];

/// One raw, loosely-typed analysis payload for a file or chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawAnalysis(Value);

impl RawAnalysis {
    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    /// Parse a model response that should contain a JSON object.
    ///
    /// Markdown fences and leading/trailing prose around the object are
    /// stripped before parsing.
    pub fn from_model_response(file_path: &str, response: &str) -> Result<Self> {
        let cleaned = extract_json_text(response);
        serde_json::from_str(cleaned)
            .map(Self)
            .map_err(|source| AnalysisError::InvalidJson {
                file_path: file_path.to_string(),
                source,
            })
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for RawAnalysis {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Cut the JSON object out of a model response.
fn extract_json_text(response: &str) -> &str {
    let mut text = response.trim();

    for fence in ["```json", "```"] {
        if let Some(rest) = text.strip_prefix(fence) {
            text = match rest.find("```") {
                Some(end) => &rest[..end],
                None => rest,
            };
            break;
        }
    }

    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if start < end {
            text = &text[start..=end];
        }
    }

    text.trim()
}
