//! Relationship Graph
//!
//! The owned aggregate of every `FunctionRecord` and `FileRecord` reported
//! across all files and chunks. Mutation happens only through [`ingest`];
//! everything else is a read-only query computed from the current contents.
//!
//! Call resolution lives in `resolve.rs`, path tracing in `paths.rs` and the
//! statistics in `summary.rs`; they all extend this type.
//!
//! [`ingest`]: RelationshipGraph::ingest

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, warn};

use crate::domain::normalizer::NormalizedFile;
use crate::domain::record::{FileRecord, FunctionRecord};

/// What one ingestion call did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestOutcome {
    pub inserted: usize,
    pub merged: usize,
    /// Records whose `file_path` did not match the file being ingested
    pub rejected: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationshipGraph {
    /// qualified_name -> record
    pub(crate) functions: BTreeMap<String, FunctionRecord>,
    /// file_path -> record
    pub(crate) files: BTreeMap<String, FileRecord>,
    /// file_path -> qualified names defined in it
    pub(crate) file_functions: BTreeMap<String, BTreeSet<String>>,
}

impl RelationshipGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one file's (or chunk's) records into the graph.
    ///
    /// Re-reported functions get their calls unioned and their entry flag
    /// OR-ed; text fields keep the first-seen value. Ingesting the same chunk
    /// twice leaves the graph unchanged.
    pub fn ingest(&mut self, file: FileRecord, functions: Vec<FunctionRecord>) -> IngestOutcome {
        let file_path = file.file_path.clone();
        let mut outcome = IngestOutcome::default();

        match self.files.get_mut(&file_path) {
            Some(existing) => existing.merge(file),
            None => {
                self.files.insert(file_path.clone(), file);
            }
        }
        let defined = self.file_functions.entry(file_path.clone()).or_default();

        for function in functions {
            if function.file_path != file_path {
                warn!(
                    "{}: dropping '{}' reported for another file ({})",
                    file_path, function.qualified_name, function.file_path
                );
                outcome.rejected += 1;
                continue;
            }

            match self.functions.get_mut(&function.qualified_name) {
                Some(existing) => {
                    debug!("{}: merging duplicate report of '{}'", file_path, function.display_name);
                    existing.merge(function);
                    outcome.merged += 1;
                }
                None => {
                    defined.insert(function.qualified_name.clone());
                    self.functions.insert(function.qualified_name.clone(), function);
                    outcome.inserted += 1;
                }
            }
        }

        self.flag_declared_entry_points(&file_path);
        outcome
    }

    pub fn ingest_normalized(&mut self, normalized: NormalizedFile) -> IngestOutcome {
        self.ingest(normalized.file, normalized.functions)
    }

    /// A chunk may declare an entry point that another chunk defines; flag
    /// every function of the file whose name is declared anywhere in it.
    /// Fallback flags are withdrawn once the file declares anything.
    fn flag_declared_entry_points(&mut self, file_path: &str) {
        let (Some(file), Some(defined)) = (self.files.get(file_path), self.file_functions.get(file_path))
        else {
            return;
        };
        let has_declarations = !file.declared_entry_points.is_empty();
        for qualified_name in defined {
            let Some(function) = self.functions.get_mut(qualified_name) else {
                continue;
            };
            if file.declared_entry_points.contains(&function.display_name) {
                function.is_entry_point = true;
                function.fallback_entry = false;
            } else if has_declarations && function.withdraw_fallback_entry() {
                debug!(
                    "{}: '{}' is no longer an entry point, the file declares its own",
                    file_path, function.display_name
                );
            }
        }
    }

    pub fn function(&self, qualified_name: &str) -> Option<&FunctionRecord> {
        self.functions.get(qualified_name)
    }

    pub fn contains(&self, qualified_name: &str) -> bool {
        self.functions.contains_key(qualified_name)
    }

    /// All functions, ordered by qualified name.
    pub fn functions(&self) -> impl Iterator<Item = &FunctionRecord> {
        self.functions.values()
    }

    pub fn file(&self, file_path: &str) -> Option<&FileRecord> {
        self.files.get(file_path)
    }

    /// All files, ordered by path.
    pub fn files(&self) -> impl Iterator<Item = &FileRecord> {
        self.files.values()
    }

    pub fn functions_in_file(&self, file_path: &str) -> Vec<&FunctionRecord> {
        self.file_functions
            .get(file_path)
            .map(|names| names.iter().filter_map(|qn| self.functions.get(qn)).collect())
            .unwrap_or_default()
    }

    /// Raw dependency strings reported for a file, sorted.
    pub fn file_dependencies(&self, file_path: &str) -> Vec<&str> {
        self.files
            .get(file_path)
            .map(|f| f.dependencies.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Every function flagged as an entry point, ordered by qualified name.
    pub fn entry_points(&self) -> Vec<&FunctionRecord> {
        self.functions.values().filter(|f| f.is_entry_point).collect()
    }

    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty() && self.files.is_empty()
    }
}
