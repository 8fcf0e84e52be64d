/// Pipeline Verification Tests
///
/// Envelopes on disk -> AnalyzeUsecase -> snapshot -> regenerated graph.

use std::fs;
use std::path::Path;

use relgraph::api::dto::GraphSnapshot;
use relgraph::application::AnalyzeUsecase;
use relgraph::config::GraphConfig;
use relgraph::infrastructure::{JsonDirSource, JsonSnapshotStore};
use serde_json::json;
use tempfile::tempdir;

fn write_envelope(dir: &Path, name: &str, envelope: serde_json::Value) {
    fs::write(dir.join(name), serde_json::to_string_pretty(&envelope).unwrap()).unwrap();
}

fn populate(dir: &Path) {
    write_envelope(
        dir,
        "000_main.json",
        json!({
            "file_path": "app/main.py",
            "analysis": "```json\n{\"functions\": [{\"name\": \"main\", \"calls\": [\"load_config\", \"Server.start\"]}], \"entry_points\": [\"main\"], \"dependencies\": [\"argparse\"], \"summary\": \"CLI entry point\"}\n```"
        }),
    );
    write_envelope(
        dir,
        "001_server_a.json",
        json!({
            "file_path": "app/server.py",
            "chunk": 0,
            "analysis": {
                "functions": [{"name": "Server.start", "calls": ["Server.loop"]}],
                "dependencies": ["socket"]
            }
        }),
    );
    write_envelope(
        dir,
        "002_server_b.json",
        json!({
            "file_path": "app/server.py",
            "chunk": 1,
            "analysis": {
                "functions": [{"name": "Server.loop", "calls": ["Server.loop", "handle"]}],
                "dependencies": ["select"],
                "summary": "Socket server"
            }
        }),
    );
    write_envelope(
        dir,
        "003_config.json",
        json!({
            "file_path": "app/config.py",
            "analysis": {"functions": [{"name": "load_config", "calls": ["open"]}]}
        }),
    );
    write_envelope(
        dir,
        "004_empty.json",
        json!({"file_path": "app/empty.py", "analysis": {}}),
    );
    fs::write(dir.join("005_garbage.json"), "the model timed out").unwrap();
}

#[test]
fn test_directory_run_produces_expected_graph() {
    let dir = tempdir().unwrap();
    populate(dir.path());

    let config = GraphConfig::default();
    let source = JsonDirSource::new(dir.path());
    let normalizer = config.normalizer();
    let report = AnalyzeUsecase {
        source: &source,
        normalizer: &normalizer,
        workers: Some(2),
    }
    .run()
    .unwrap();

    assert_eq!(report.ingested_chunks, 4);
    assert_eq!(report.skipped.len(), 2);
    assert!(report.skipped.iter().any(|s| s.file_path == "app/empty.py"));

    let graph = &report.graph;
    assert_eq!(graph.file_count(), 3);
    assert_eq!(
        graph.file_dependencies("app/server.py"),
        vec!["select", "socket"]
    );
    assert_eq!(graph.file("app/server.py").unwrap().summary, "Socket server");
    assert_eq!(
        graph.callees("app/main.py::main"),
        vec!["app/config.py::load_config", "app/server.py::Server.start"]
    );

    let paths = graph.trace_paths(config.max_path_length);
    assert_eq!(paths.len(), 1);
    assert_eq!(
        paths[0].nodes,
        vec![
            "app/main.py::main",
            "app/config.py::load_config",
        ]
    );

    let from_server = graph.trace_path_from("app/server.py::Server.start", 8);
    assert_eq!(
        from_server.nodes,
        vec![
            "app/server.py::Server.start",
            "app/server.py::Server.loop",
            "app/server.py::Server.loop",
        ]
    );
    assert!(from_server.is_cyclic());

    let summary = graph.summary();
    assert_eq!(summary.total_functions, 4);
    assert_eq!(summary.unresolved_calls, 2);
}

#[test]
fn test_snapshot_regenerates_without_reingesting() {
    let dir = tempdir().unwrap();
    let analyses = dir.path().join("analyses");
    fs::create_dir(&analyses).unwrap();
    populate(&analyses);
    let snapshot_path = dir.path().join("results").join("analysis_data.json");

    let source = JsonDirSource::new(&analyses);
    let normalizer = GraphConfig::default().normalizer();
    let report = AnalyzeUsecase {
        source: &source,
        normalizer: &normalizer,
        workers: Some(1),
    }
    .run_and_export(&JsonSnapshotStore, &snapshot_path)
    .unwrap();

    let snapshot = JsonSnapshotStore::load(&snapshot_path).unwrap();
    assert_eq!(snapshot.entry_points, vec!["app/main.py::main"]);
    let fresh = GraphSnapshot::from(&report.graph);
    assert_eq!(snapshot.edges, fresh.edges);
    assert_eq!(snapshot.unresolved, fresh.unresolved);
    assert_eq!(snapshot.functions, fresh.functions);

    let regenerated = snapshot.into_graph();
    assert_eq!(regenerated, report.graph);
    assert_eq!(regenerated.trace_paths(64), report.graph.trace_paths(64));
}
