/// Snapshot Store Module
///
/// Persists graph snapshots as pretty-printed JSON so that paths and diagrams
/// can be regenerated without re-running the analyzer.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::api::dto::{GraphSnapshot, SNAPSHOT_VERSION};
use crate::ports::SnapshotExporter;

pub struct JsonSnapshotStore;

impl JsonSnapshotStore {
    /// Read a snapshot back, refusing other format versions.
    pub fn load(path: &Path) -> Result<GraphSnapshot> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        let snapshot: GraphSnapshot =
            serde_json::from_str(&content).context("Failed to deserialize snapshot")?;
        if snapshot.version != SNAPSHOT_VERSION {
            anyhow::bail!(
                "snapshot version {} is not supported (expected {})",
                snapshot.version,
                SNAPSHOT_VERSION
            );
        }
        Ok(snapshot)
    }
}

impl SnapshotExporter for JsonSnapshotStore {
    fn export(&self, snapshot: &GraphSnapshot, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(snapshot).context("Failed to serialize snapshot")?;
        let mut file = File::create(path)
            .with_context(|| format!("Failed to create snapshot file {}", path.display()))?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::graph::RelationshipGraph;
    use crate::domain::record::{FileRecord, FunctionRecord};
    use tempfile::tempdir;

    fn graph() -> RelationshipGraph {
        let mut graph = RelationshipGraph::new();
        graph.ingest(
            FileRecord::new("a.py"),
            vec![FunctionRecord::new("a.py", "main").with_calls(["helper"]).entry_point()],
        );
        graph.ingest(FileRecord::new("b.py"), vec![FunctionRecord::new("b.py", "helper")]);
        graph
    }

    #[test]
    fn test_export_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("snapshot.json");
        let original = graph();

        JsonSnapshotStore
            .export(&GraphSnapshot::from(&original), &path)
            .unwrap();
        let loaded = JsonSnapshotStore::load(&path).unwrap();

        assert_eq!(loaded.edges.len(), 1);
        assert_eq!(loaded.into_graph(), original);
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        let mut snapshot = GraphSnapshot::from(&graph());
        snapshot.version = SNAPSHOT_VERSION + 1;
        JsonSnapshotStore.export(&snapshot, &path).unwrap();

        let err = JsonSnapshotStore::load(&path).unwrap_err();
        assert!(err.to_string().contains("not supported"));
    }
}
