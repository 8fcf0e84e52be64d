//! Top-level statistics over a relationship graph.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::graph::RelationshipGraph;
use crate::domain::resolve::CallResolution;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSummary {
    pub total_files: usize,
    pub total_functions: usize,
    /// Distinct raw dependency strings across all files
    pub total_dependencies: usize,
    pub entry_points: usize,
    pub resolved_edges: usize,
    /// Distinct (caller, callee) references
    pub call_references: usize,
    pub unresolved_calls: usize,
    pub ambiguous_calls: usize,
    /// (unresolved + ambiguous) / call_references, 0 when there are none
    pub unresolved_ratio: f64,
}

impl RelationshipGraph {
    pub fn summary(&self) -> GraphSummary {
        let references = self.all_call_references();
        let mut unresolved = 0;
        let mut ambiguous = 0;
        for reference in &references {
            match reference.resolution {
                CallResolution::Resolved(_) => {}
                CallResolution::Ambiguous(_) => ambiguous += 1,
                CallResolution::Unresolved => unresolved += 1,
            }
        }

        let dependencies: BTreeSet<&str> = self
            .files()
            .flat_map(|f| f.dependencies.iter().map(String::as_str))
            .collect();

        let unresolved_ratio = if references.is_empty() {
            0.0
        } else {
            (unresolved + ambiguous) as f64 / references.len() as f64
        };

        GraphSummary {
            total_files: self.file_count(),
            total_functions: self.function_count(),
            total_dependencies: dependencies.len(),
            entry_points: self.entry_points().len(),
            resolved_edges: self.resolved_edges().len(),
            call_references: references.len(),
            unresolved_calls: unresolved,
            ambiguous_calls: ambiguous,
            unresolved_ratio,
        }
    }
}
