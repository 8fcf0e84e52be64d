//! Entry Point Detection Module
//!
//! A function is an entry point when the analyzer declared it as one, or when
//! one of the registered heuristics recognises it.

use std::collections::BTreeSet;
use std::path::Path;

use crate::domain::language::Language;

/// Why a function was flagged as an entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryPointKind {
    /// Listed in the payload's `entry_points`
    Declared,
    /// Recognised by the named heuristic
    Heuristic(&'static str),
    /// Recognised by a fallback heuristic; withdrawn once the file declares
    /// entry points in any chunk
    Fallback(&'static str),
}

/// What a heuristic gets to look at besides the function name.
#[derive(Debug, Clone, Copy)]
pub struct HeuristicContext<'a> {
    pub file_path: &'a str,
    pub language: Option<Language>,
    /// Entry points the payload declared for this file/chunk
    pub declared: &'a BTreeSet<String>,
}

impl<'a> HeuristicContext<'a> {
    pub fn new(file_path: &'a str, declared: &'a BTreeSet<String>) -> Self {
        Self {
            file_path,
            language: Language::from_path(Path::new(file_path)),
            declared,
        }
    }
}

/// Pluggable entry-point predicate.
pub trait EntryPointHeuristic: Send + Sync {
    fn name(&self) -> &'static str;
    fn matches(&self, ctx: &HeuristicContext<'_>, function_name: &str) -> bool;

    /// Only meaningful for files that declare no entry points at all.
    fn fallback(&self) -> bool {
        false
    }
}

/// `main` (or the language's equivalent) in a file that declares no entry
/// points of its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConventionalMain;

impl EntryPointHeuristic for ConventionalMain {
    fn name(&self) -> &'static str {
        "conventional-main"
    }

    fn matches(&self, ctx: &HeuristicContext<'_>, function_name: &str) -> bool {
        if !ctx.declared.is_empty() {
            return false;
        }
        let names: &[&str] = match ctx.language {
            Some(lang) => lang.conventional_entry_names(),
            None => &["main"],
        };
        names.contains(&function_name)
    }

    fn fallback(&self) -> bool {
        true
    }
}

/// Adapter so plain closures can be registered as heuristics.
pub struct PredicateHeuristic<F> {
    name: &'static str,
    predicate: F,
}

impl<F> PredicateHeuristic<F>
where
    F: Fn(&HeuristicContext<'_>, &str) -> bool + Send + Sync,
{
    pub fn new(name: &'static str, predicate: F) -> Self {
        Self { name, predicate }
    }
}

impl<F> EntryPointHeuristic for PredicateHeuristic<F>
where
    F: Fn(&HeuristicContext<'_>, &str) -> bool + Send + Sync,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn matches(&self, ctx: &HeuristicContext<'_>, function_name: &str) -> bool {
        (self.predicate)(ctx, function_name)
    }
}

/// Entry point detector
#[derive(Default)]
pub struct EntryPointDetector {
    heuristics: Vec<Box<dyn EntryPointHeuristic>>,
}

impl EntryPointDetector {
    /// Detector with no heuristics: only declared names count.
    pub fn declared_only() -> Self {
        Self::default()
    }

    /// Detector with the built-in heuristics.
    pub fn with_defaults() -> Self {
        Self::declared_only().with_heuristic(ConventionalMain)
    }

    pub fn with_heuristic(mut self, heuristic: impl EntryPointHeuristic + 'static) -> Self {
        self.heuristics.push(Box::new(heuristic));
        self
    }

    pub fn heuristic_names(&self) -> Vec<&'static str> {
        self.heuristics.iter().map(|h| h.name()).collect()
    }

    /// Classify one function. Declared names win over heuristics.
    pub fn detect(&self, ctx: &HeuristicContext<'_>, function_name: &str) -> Option<EntryPointKind> {
        if ctx.declared.contains(function_name) {
            return Some(EntryPointKind::Declared);
        }
        self.heuristics
            .iter()
            .find(|h| h.matches(ctx, function_name))
            .map(|h| {
                if h.fallback() {
                    EntryPointKind::Fallback(h.name())
                } else {
                    EntryPointKind::Heuristic(h.name())
                }
            })
    }
}
