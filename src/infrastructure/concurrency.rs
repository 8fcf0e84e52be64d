/// Concurrency management.
///
/// Normalization is pure and fans out over a rayon pool; ingestion is
/// single-writer, so every normalized batch goes through one queue drained by
/// one thread that owns the graph.

use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

use anyhow::{anyhow, Context, Result};
use log::{debug, info};

use crate::domain::graph::RelationshipGraph;
use crate::domain::normalizer::NormalizedFile;

/// Worker count: the configured value, or half the cores (minimum 1).
pub fn worker_count(configured: Option<usize>) -> usize {
    configured
        .unwrap_or_else(|| num_cpus::get() / 2)
        .max(1)
}

/// Build a dedicated pool for normalization.
pub fn build_pool(configured: Option<usize>) -> Result<rayon::ThreadPool> {
    let workers = worker_count(configured);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("relgraph-normalize-{}", i))
        .build()
        .context("Failed to build normalization thread pool")?;
    debug!("normalization pool: {} workers ({} cores)", workers, num_cpus::get());
    Ok(pool)
}

/// Single-consumer ingestion queue.
///
/// Producers may send from any thread; the consumer applies batches one at a
/// time in arrival order.
pub struct IngestQueue {
    sender: Sender<NormalizedFile>,
    consumer: JoinHandle<(RelationshipGraph, usize)>,
}

impl IngestQueue {
    pub fn spawn(mut graph: RelationshipGraph) -> Result<Self> {
        let (sender, receiver) = mpsc::channel::<NormalizedFile>();
        let consumer = thread::Builder::new()
            .name("relgraph-ingest".to_string())
            .spawn(move || {
                let mut batches = 0;
                for batch in receiver {
                    let path = batch.file.file_path.clone();
                    let outcome = graph.ingest_normalized(batch);
                    debug!(
                        "ingested {}: {} new, {} merged, {} rejected",
                        path, outcome.inserted, outcome.merged, outcome.rejected
                    );
                    batches += 1;
                }
                (graph, batches)
            })
            .context("Failed to spawn ingestion thread")?;
        Ok(Self { sender, consumer })
    }

    /// Extra handle for producers on other threads.
    #[cfg(test)]
    pub(crate) fn sender(&self) -> Sender<NormalizedFile> {
        self.sender.clone()
    }

    pub fn push(&self, batch: NormalizedFile) -> Result<()> {
        self.sender
            .send(batch)
            .map_err(|_| anyhow!("ingestion thread has stopped"))
    }

    /// Close the queue and wait for the consumer to drain it.
    ///
    /// Returns once every outstanding `sender()` clone has been dropped too.
    pub fn finish(self) -> Result<(RelationshipGraph, usize)> {
        drop(self.sender);
        let (graph, batches) = self
            .consumer
            .join()
            .map_err(|_| anyhow!("ingestion thread panicked"))?;
        info!("ingestion finished: {} batches, {} functions", batches, graph.function_count());
        Ok((graph, batches))
    }
}
