use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::graph::RelationshipGraph;
use crate::domain::record::{FileRecord, FunctionRecord};
use crate::domain::resolve::CallResolution;
use crate::domain::summary::GraphSummary;

/// Bumped whenever the snapshot layout changes incompatibly.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Everything needed to regenerate visualizations without re-ingesting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub version: u32,
    pub functions: Vec<FunctionRecord>,
    pub files: Vec<FileRecord>,
    pub edges: Vec<EdgeDto>,
    pub unresolved: Vec<UnresolvedCallDto>,
    pub entry_points: Vec<String>,
    pub summary: GraphSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeDto {
    pub from: String,
    pub to: String,
    pub cross_file: bool,
}

/// A call that produced no edge. Non-empty `candidates` means ambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedCallDto {
    pub caller: String,
    pub callee: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub candidates: Vec<String>,
}

impl From<&RelationshipGraph> for GraphSnapshot {
    fn from(graph: &RelationshipGraph) -> Self {
        let file_of = |qn: &str| graph.function(qn).map(|f| f.file_path.as_str());

        let edges = graph
            .resolved_edges()
            .into_iter()
            .map(|e| EdgeDto {
                cross_file: file_of(&e.from) != file_of(&e.to),
                from: e.from,
                to: e.to,
            })
            .collect();

        let unresolved = graph
            .unresolved_calls()
            .into_iter()
            .map(|r| UnresolvedCallDto {
                caller: r.caller,
                callee: r.callee,
                candidates: match r.resolution {
                    CallResolution::Ambiguous(candidates) => candidates,
                    _ => Vec::new(),
                },
            })
            .collect();

        GraphSnapshot {
            version: SNAPSHOT_VERSION,
            functions: graph.functions().cloned().collect(),
            files: graph.files().cloned().collect(),
            edges,
            unresolved,
            entry_points: graph
                .entry_points()
                .into_iter()
                .map(|f| f.qualified_name.clone())
                .collect(),
            summary: graph.summary(),
        }
    }
}

impl GraphSnapshot {
    /// Rebuild the graph the snapshot was taken from.
    ///
    /// Edges, entry points and the summary are derived data and are
    /// recomputed by the graph rather than read back.
    pub fn into_graph(self) -> RelationshipGraph {
        let mut by_file: BTreeMap<String, Vec<FunctionRecord>> = BTreeMap::new();
        for function in self.functions {
            by_file.entry(function.file_path.clone()).or_default().push(function);
        }

        let mut graph = RelationshipGraph::new();
        for file in self.files {
            let functions = by_file.remove(&file.file_path).unwrap_or_default();
            graph.ingest(file, functions);
        }
        for (file_path, functions) in by_file {
            graph.ingest(FileRecord::new(&file_path), functions);
        }
        graph
    }
}
