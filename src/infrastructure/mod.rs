// Infrastructure implementations: file-backed sources and stores, worker pools.

pub mod concurrency;
pub mod json_source;
pub mod snapshot_store;

pub use concurrency::{build_pool, worker_count, IngestQueue};
pub use json_source::JsonDirSource;
pub use snapshot_store::JsonSnapshotStore;
