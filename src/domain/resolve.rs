//! Call resolution.
//!
//! Raw callee strings are matched against the graph on demand, so the answer
//! always reflects everything ingested so far. Priority, first match wins:
//!
//! 1. the callee is itself a qualified name in the graph;
//! 2. a function with that display name in the caller's own file;
//! 3. a function with that display name in exactly one other file.
//!
//! Anything else is unresolved. A name defined in several other files is
//! reported as ambiguous rather than guessed.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::domain::graph::RelationshipGraph;
use crate::domain::record::{qualified_name, FunctionRecord};

/// Outcome of resolving one raw callee name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallResolution {
    Resolved(String),
    /// Candidate qualified names, sorted
    Ambiguous(Vec<String>),
    Unresolved,
}

impl CallResolution {
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::Resolved(qn) => Some(qn),
            _ => None,
        }
    }
}

/// One raw call made by a function, with its resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallReference {
    pub caller: String,
    pub callee: String,
    pub resolution: CallResolution,
}

/// A call matched to exactly one node.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResolvedEdge {
    pub from: String,
    pub to: String,
}

/// display_name -> functions carrying it, built per query.
pub(crate) struct NameIndex<'g> {
    by_display: HashMap<&'g str, Vec<&'g FunctionRecord>>,
}

impl<'g> NameIndex<'g> {
    pub(crate) fn build(graph: &'g RelationshipGraph) -> Self {
        let mut by_display: HashMap<&str, Vec<&FunctionRecord>> = HashMap::new();
        for function in graph.functions.values() {
            by_display
                .entry(function.display_name.as_str())
                .or_default()
                .push(function);
        }
        Self { by_display }
    }

    pub(crate) fn resolve(
        &self,
        graph: &RelationshipGraph,
        caller: &FunctionRecord,
        callee: &str,
    ) -> CallResolution {
        if graph.functions.contains_key(callee) {
            return CallResolution::Resolved(callee.to_string());
        }

        let same_file = qualified_name(&caller.file_path, callee);
        if graph.functions.contains_key(&same_file) {
            return CallResolution::Resolved(same_file);
        }

        let mut elsewhere: Vec<String> = self
            .by_display
            .get(callee)
            .map(|candidates| {
                candidates
                    .iter()
                    .filter(|f| f.file_path != caller.file_path)
                    .map(|f| f.qualified_name.clone())
                    .collect()
            })
            .unwrap_or_default();

        match elsewhere.len() {
            0 => CallResolution::Unresolved,
            1 => CallResolution::Resolved(elsewhere.remove(0)),
            _ => {
                elsewhere.sort();
                CallResolution::Ambiguous(elsewhere)
            }
        }
    }

    /// Distinct resolved targets of `caller`, in first-call order.
    pub(crate) fn targets(&self, graph: &RelationshipGraph, caller: &FunctionRecord) -> Vec<String> {
        let mut seen = BTreeSet::new();
        caller
            .distinct_calls()
            .into_iter()
            .filter_map(|callee| match self.resolve(graph, caller, callee) {
                CallResolution::Resolved(target) => Some(target),
                _ => None,
            })
            .filter(|target| seen.insert(target.clone()))
            .collect()
    }
}

impl RelationshipGraph {
    /// Resolve one raw callee as if called from `caller`.
    pub fn resolve_call(&self, caller: &str, callee: &str) -> Option<CallResolution> {
        let caller = self.functions.get(caller)?;
        Some(NameIndex::build(self).resolve(self, caller, callee))
    }

    /// Every distinct raw call of a function with its resolution.
    pub fn call_references(&self, qualified_name: &str) -> Vec<CallReference> {
        let Some(caller) = self.functions.get(qualified_name) else {
            return Vec::new();
        };
        let index = NameIndex::build(self);
        references_of(&index, self, caller)
    }

    /// Every call reference in the graph, ordered by caller.
    pub fn all_call_references(&self) -> Vec<CallReference> {
        let index = NameIndex::build(self);
        self.functions
            .values()
            .flat_map(|caller| references_of(&index, self, caller))
            .collect()
    }

    /// References that did not resolve to a node (unresolved or ambiguous).
    pub fn unresolved_calls(&self) -> Vec<CallReference> {
        self.all_call_references()
            .into_iter()
            .filter(|r| r.resolution.target().is_none())
            .collect()
    }

    /// Resolved targets of a function, deduplicated, in call order.
    pub fn callees(&self, qualified_name: &str) -> Vec<String> {
        match self.functions.get(qualified_name) {
            Some(caller) => NameIndex::build(self).targets(self, caller),
            None => Vec::new(),
        }
    }

    /// Functions with a resolved edge into `qualified_name`, sorted.
    pub fn callers(&self, qualified_name: &str) -> Vec<String> {
        if !self.functions.contains_key(qualified_name) {
            return Vec::new();
        }
        self.resolved_edges()
            .into_iter()
            .filter(|e| e.to == qualified_name)
            .map(|e| e.from)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// All resolved edges, sorted and deduplicated.
    pub fn resolved_edges(&self) -> Vec<ResolvedEdge> {
        let index = NameIndex::build(self);
        let edges: BTreeSet<ResolvedEdge> = self
            .functions
            .values()
            .flat_map(|caller| {
                index
                    .targets(self, caller)
                    .into_iter()
                    .map(move |to| ResolvedEdge {
                        from: caller.qualified_name.clone(),
                        to,
                    })
            })
            .collect();
        edges.into_iter().collect()
    }

    /// Adjacency over resolved edges, callees in call order.
    pub(crate) fn adjacency(&self) -> HashMap<String, Vec<String>> {
        let index = NameIndex::build(self);
        self.functions
            .values()
            .map(|caller| (caller.qualified_name.clone(), index.targets(self, caller)))
            .collect()
    }

    /// Other files holding targets of this file's resolved calls.
    pub fn file_call_dependencies(&self, file_path: &str) -> Vec<String> {
        let index = NameIndex::build(self);
        let targets: BTreeSet<String> = self
            .functions_in_file(file_path)
            .into_iter()
            .flat_map(|caller| index.targets(self, caller))
            .filter_map(|qn| self.functions.get(&qn).map(|f| f.file_path.clone()))
            .filter(|target_file| target_file != file_path)
            .collect();
        targets.into_iter().collect()
    }
}

fn references_of(
    index: &NameIndex<'_>,
    graph: &RelationshipGraph,
    caller: &FunctionRecord,
) -> Vec<CallReference> {
    caller
        .distinct_calls()
        .into_iter()
        .map(|callee| CallReference {
            caller: caller.qualified_name.clone(),
            callee: callee.to_string(),
            resolution: index.resolve(graph, caller, callee),
        })
        .collect()
}
