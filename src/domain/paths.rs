//! Execution Path Tracing
//!
//! Walks resolved call edges from each entry point to produce the "major
//! execution paths" the visualizer draws. The walk is iterative and carries
//! its own visited map, so cycles and deep chains are bounded without relying
//! on the call stack.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::graph::RelationshipGraph;

/// Default upper bound on nodes per path.
pub const DEFAULT_MAX_PATH_LENGTH: usize = 64;

/// How a path ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathTermination {
    /// Reached a function with no resolved callees
    Leaf,
    /// Stepped back onto a node already on the path; that node is repeated
    /// last unless the path was already at its maximum length
    Cycle,
    /// Hit the maximum length with callees still left to follow
    Truncated,
    /// The entry point is not a node of the graph
    BrokenEntry,
}

/// One DFS walk from an entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionPath {
    pub entry: String,
    /// Qualified names in walk order
    pub nodes: Vec<String>,
    pub termination: PathTermination,
    /// Position of the first occurrence of the repeated node, for cycles
    pub cycle_start: Option<usize>,
}

impl ExecutionPath {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn is_cyclic(&self) -> bool {
        self.termination == PathTermination::Cycle
    }

    pub fn is_truncated(&self) -> bool {
        self.termination == PathTermination::Truncated
    }

    pub fn is_broken_entry(&self) -> bool {
        self.termination == PathTermination::BrokenEntry
    }

    fn broken(entry: &str) -> Self {
        Self {
            entry: entry.to_string(),
            nodes: vec![entry.to_string()],
            termination: PathTermination::BrokenEntry,
            cycle_start: None,
        }
    }
}

impl RelationshipGraph {
    /// One path per entry point, ordered by entry qualified name.
    ///
    /// `max_length` below 1 is treated as 1.
    pub fn trace_paths(&self, max_length: usize) -> Vec<ExecutionPath> {
        let adjacency = self.adjacency();
        self.entry_points()
            .into_iter()
            .map(|entry| walk(&adjacency, &entry.qualified_name, max_length))
            .collect()
    }

    /// Trace from any node. A name that is not in the graph yields a
    /// single-node `BrokenEntry` path.
    pub fn trace_path_from(&self, qualified_name: &str, max_length: usize) -> ExecutionPath {
        if !self.contains(qualified_name) {
            log::warn!("entry point '{}' is not in the graph", qualified_name);
            return ExecutionPath::broken(qualified_name);
        }
        walk(&self.adjacency(), qualified_name, max_length)
    }
}

/// Follow the first not-yet-visited callee at each step. When every callee is
/// already on the path, the path is closed as a cycle and the first callee is
/// appended once more if the length bound leaves room for it.
fn walk(adjacency: &HashMap<String, Vec<String>>, entry: &str, max_length: usize) -> ExecutionPath {
    let max_length = max_length.max(1);
    let mut nodes = vec![entry.to_string()];
    let mut visited: HashMap<&str, usize> = HashMap::from([(entry, 0)]);
    let mut current = entry;

    let (termination, cycle_start) = loop {
        let callees = adjacency.get(current).map(Vec::as_slice).unwrap_or_default();
        let Some(first) = callees.first() else {
            break (PathTermination::Leaf, None);
        };

        match callees.iter().find(|c| !visited.contains_key(c.as_str())) {
            Some(_) if nodes.len() >= max_length => break (PathTermination::Truncated, None),
            Some(next) => {
                visited.insert(next.as_str(), nodes.len());
                nodes.push(next.clone());
                current = next.as_str();
            }
            None => {
                if nodes.len() < max_length {
                    nodes.push(first.clone());
                }
                break (PathTermination::Cycle, visited.get(first.as_str()).copied());
            }
        }
    };

    ExecutionPath {
        entry: entry.to_string(),
        nodes,
        termination,
        cycle_start,
    }
}
