//! Canonical records produced by the normalizer and owned by the graph.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Separator between the file path and the local name in a qualified name.
pub const QUALIFIER: &str = "::";

/// Build the graph key for a function: `file_path::local_name`.
pub fn qualified_name(file_path: &str, local_name: &str) -> String {
    format!("{}{}{}", file_path, QUALIFIER, local_name)
}

/// One function or method reported for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionRecord {
    /// Unique key, `file_path::display_name`
    pub qualified_name: String,
    /// Name as reported by the analyzer (may be `Class.method`)
    pub display_name: String,
    /// Owning file
    pub file_path: String,
    pub description: String,
    pub inputs: String,
    pub outputs: String,
    /// Raw callee names, unresolved, in reported order
    pub calls: Vec<String>,
    pub is_entry_point: bool,
    /// Flagged only by a fallback heuristic such as conventional `main`
    #[serde(default)]
    pub fallback_entry: bool,
}

impl FunctionRecord {
    pub fn new(file_path: &str, display_name: &str) -> Self {
        Self {
            qualified_name: qualified_name(file_path, display_name),
            display_name: display_name.to_string(),
            file_path: file_path.to_string(),
            description: String::new(),
            inputs: String::new(),
            outputs: String::new(),
            calls: Vec::new(),
            is_entry_point: false,
            fallback_entry: false,
        }
    }

    pub fn with_calls<I, S>(mut self, calls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.calls = calls.into_iter().map(Into::into).collect();
        self
    }

    pub fn entry_point(mut self) -> Self {
        self.is_entry_point = true;
        self
    }

    /// Merge a re-reported copy of this function.
    ///
    /// Calls are unioned (new names appended in their reported order) and the
    /// entry flag is OR-ed. Descriptive text stays first-seen. The flag stays
    /// fallback-only unless one side flagged it by other means.
    pub fn merge(&mut self, other: FunctionRecord) {
        for call in other.calls {
            if !self.calls.contains(&call) {
                self.calls.push(call);
            }
        }
        self.fallback_entry = match (self.is_entry_point, other.is_entry_point) {
            (true, true) => self.fallback_entry && other.fallback_entry,
            (true, false) => self.fallback_entry,
            (false, true) => other.fallback_entry,
            (false, false) => false,
        };
        self.is_entry_point |= other.is_entry_point;
    }

    /// Drop a flag that only a fallback heuristic set.
    pub(crate) fn withdraw_fallback_entry(&mut self) -> bool {
        if !self.fallback_entry {
            return false;
        }
        self.fallback_entry = false;
        self.is_entry_point = false;
        true
    }

    /// Distinct callee names in first-reported order.
    pub fn distinct_calls(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.calls
            .iter()
            .map(String::as_str)
            .filter(|c| seen.insert(*c))
            .collect()
    }
}

/// Aggregated metadata for one source file across all of its chunks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub file_path: String,
    pub dependencies: BTreeSet<String>,
    /// First non-empty summary seen
    pub summary: String,
    pub declared_entry_points: BTreeSet<String>,
}

impl FileRecord {
    pub fn new(file_path: &str) -> Self {
        Self {
            file_path: file_path.to_string(),
            ..Self::default()
        }
    }

    pub fn merge(&mut self, other: FileRecord) {
        self.dependencies.extend(other.dependencies);
        self.declared_entry_points.extend(other.declared_entry_points);
        if self.summary.is_empty() && !other.summary.is_empty() {
            self.summary = other.summary;
        }
    }
}
