// Domain model: records, normalization, the relationship graph and its traversals.

pub mod entry_point;
pub mod error;
pub mod graph;
pub mod language;
pub mod normalizer;
pub mod paths;
pub mod raw;
pub mod record;
pub mod resolve;
pub mod summary;

pub use entry_point::{ConventionalMain, EntryPointDetector, EntryPointHeuristic, HeuristicContext, PredicateHeuristic};
pub use error::AnalysisError;
pub use graph::{IngestOutcome, RelationshipGraph};
pub use normalizer::{NormalizedFile, Normalizer};
pub use paths::{ExecutionPath, PathTermination, DEFAULT_MAX_PATH_LENGTH};
pub use raw::RawAnalysis;
pub use record::{FileRecord, FunctionRecord};
pub use resolve::{CallReference, CallResolution, ResolvedEdge};
pub use summary::GraphSummary;
