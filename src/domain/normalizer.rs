//! Record Normalizer
//!
//! Turns one raw analysis payload into a `FileRecord` plus its
//! `FunctionRecord`s. This is the boundary between untrusted model output and
//! the typed model: every field is optional, odd types are coerced, and only a
//! payload that is not an analysis at all is rejected.

use log::{debug, warn};
use serde_json::{Map, Value};

use crate::domain::entry_point::{EntryPointDetector, EntryPointKind, HeuristicContext};
use crate::domain::error::{AnalysisError, Result};
use crate::domain::raw::{RawAnalysis, RECOGNIZED_KEYS};
use crate::domain::record::{FileRecord, FunctionRecord};

/// Output of normalizing one file or chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedFile {
    pub file: FileRecord,
    pub functions: Vec<FunctionRecord>,
}

pub struct Normalizer {
    detector: EntryPointDetector,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(EntryPointDetector::with_defaults())
    }
}

impl Normalizer {
    pub fn new(detector: EntryPointDetector) -> Self {
        Self { detector }
    }

    pub fn detector(&self) -> &EntryPointDetector {
        &self.detector
    }

    /// Normalize one payload. Pure: the same input always yields the same
    /// output and nothing is recorded anywhere.
    pub fn normalize(&self, file_path: &str, raw: &RawAnalysis) -> Result<NormalizedFile> {
        let map = raw
            .value()
            .as_object()
            .ok_or_else(|| AnalysisError::malformed(file_path, "payload is not a JSON object"))?;

        if !RECOGNIZED_KEYS.iter().any(|k| map.contains_key(*k)) {
            return Err(AnalysisError::malformed(
                file_path,
                format!("none of the keys {:?} present", RECOGNIZED_KEYS),
            ));
        }

        let mut file = FileRecord::new(file_path);
        file.dependencies = string_list(map, "dependencies").into_iter().collect();
        file.declared_entry_points = string_list(map, "entry_points").into_iter().collect();
        file.summary = map.get("summary").map(text).unwrap_or_default();

        let ctx = HeuristicContext::new(file_path, &file.declared_entry_points);
        let functions = match map.get("functions") {
            Some(Value::Array(entries)) => entries
                .iter()
                .enumerate()
                .filter_map(|(idx, entry)| self.function_record(&ctx, idx, entry))
                .collect(),
            Some(Value::Null) | None => Vec::new(),
            Some(other) => {
                warn!(
                    "{}: 'functions' is {} rather than a list, ignoring",
                    file_path,
                    kind_of(other)
                );
                Vec::new()
            }
        };

        Ok(NormalizedFile { file, functions })
    }

    fn function_record(
        &self,
        ctx: &HeuristicContext<'_>,
        idx: usize,
        entry: &Value,
    ) -> Option<FunctionRecord> {
        let Some(obj) = entry.as_object() else {
            warn!("{}: functions[{}] is not an object, dropped", ctx.file_path, idx);
            return None;
        };

        let name = obj.get("name").map(text).unwrap_or_default();
        let name = name.trim();
        if name.is_empty() {
            warn!("{}: functions[{}] has no name, dropped", ctx.file_path, idx);
            return None;
        }

        let mut record = FunctionRecord::new(ctx.file_path, name);
        record.description = obj.get("description").map(text).unwrap_or_default();
        record.inputs = obj.get("inputs").map(text).unwrap_or_default();
        record.outputs = obj.get("outputs").map(text).unwrap_or_default();
        record.calls = string_list(obj, "calls");

        match self.detector.detect(ctx, name) {
            Some(EntryPointKind::Declared) => record.is_entry_point = true,
            Some(EntryPointKind::Heuristic(heuristic)) => {
                debug!("{}: '{}' flagged as entry point by {}", ctx.file_path, name, heuristic);
                record.is_entry_point = true;
            }
            Some(EntryPointKind::Fallback(heuristic)) => {
                debug!(
                    "{}: '{}' flagged as {} entry point by {}",
                    ctx.file_path,
                    name,
                    ctx.language.map(|l| l.name()).unwrap_or("unknown-language"),
                    heuristic
                );
                record.is_entry_point = true;
                record.fallback_entry = true;
            }
            None => {}
        }

        Some(record)
    }
}

/// Read a list of non-blank strings; a lone string counts as a list of one.
fn string_list(map: &Map<String, Value>, key: &str) -> Vec<String> {
    let items: Vec<&Value> = match map.get(key) {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(v @ Value::String(_)) => vec![v],
        _ => Vec::new(),
    };
    items
        .into_iter()
        .filter_map(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Coerce any JSON value into display text.
fn text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) if items.iter().all(is_scalar) => items
            .iter()
            .map(text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
