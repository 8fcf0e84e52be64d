use std::collections::BTreeSet;
use std::path::Path;

use anyhow::Result;
use log::{info, warn};
use rayon::prelude::*;

use crate::api::dto::GraphSnapshot;
use crate::domain::graph::RelationshipGraph;
use crate::domain::normalizer::Normalizer;
use crate::infrastructure::concurrency::{build_pool, IngestQueue};
use crate::ports::{AnalysisSource, SnapshotExporter};

/// An input that could not be interpreted and was left out of the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub file_path: String,
    pub chunk: usize,
    pub reason: String,
}

pub struct IngestReport {
    pub graph: RelationshipGraph,
    pub ingested_chunks: usize,
    pub skipped: Vec<SkippedFile>,
}

impl IngestReport {
    /// Distinct files with at least one skipped chunk.
    pub fn skipped_files(&self) -> usize {
        self.skipped
            .iter()
            .map(|s| s.file_path.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }
}

/// Source -> normalize (parallel) -> ingest (single writer).
pub struct AnalyzeUsecase<'a> {
    pub source: &'a dyn AnalysisSource,
    pub normalizer: &'a Normalizer,
    pub workers: Option<usize>,
}

impl<'a> AnalyzeUsecase<'a> {
    /// A bad input skips that file or chunk only; the run itself fails only
    /// when the source cannot be read at all.
    pub fn run(&self) -> Result<IngestReport> {
        let inputs = self.source.load()?;
        info!("loaded {} analyses", inputs.len());

        let pool = build_pool(self.workers)?;
        let normalizer = self.normalizer;
        let normalized: Vec<_> = pool.install(|| {
            inputs
                .par_iter()
                .map(|input| {
                    input
                        .raw()
                        .and_then(|raw| normalizer.normalize(&input.file_path, &raw))
                })
                .collect()
        });

        let queue = IngestQueue::spawn(RelationshipGraph::new())?;
        let mut skipped = Vec::new();
        for (input, result) in inputs.iter().zip(normalized) {
            match result {
                Ok(batch) => queue.push(batch)?,
                Err(e) => {
                    warn!("skipping {} (chunk {}): {}", input.file_path, input.chunk, e);
                    skipped.push(SkippedFile {
                        file_path: input.file_path.clone(),
                        chunk: input.chunk,
                        reason: e.to_string(),
                    });
                }
            }
        }
        let (graph, ingested_chunks) = queue.finish()?;

        let report = IngestReport {
            graph,
            ingested_chunks,
            skipped,
        };
        info!(
            "{} chunks ingested, {} skipped across {} files",
            report.ingested_chunks,
            report.skipped.len(),
            report.skipped_files()
        );
        Ok(report)
    }

    pub fn run_and_export(&self, exporter: &dyn SnapshotExporter, path: &Path) -> Result<IngestReport> {
        let report = self.run()?;
        exporter.export(&GraphSnapshot::from(&report.graph), path)?;
        info!("snapshot written to {}", path.display());
        Ok(report)
    }
}
