/// Relationship graph scenarios: ingestion merge rules, resolution and
/// bounded path tracing, driven end to end from raw payloads.

use relgraph::domain::{
    CallResolution, Normalizer, RawAnalysis, RelationshipGraph, ResolvedEdge, DEFAULT_MAX_PATH_LENGTH,
};
use serde_json::{json, Value};

/// Normalize and ingest `(file_path, payload)` pairs, skipping malformed ones.
fn build(payloads: &[(&str, Value)]) -> RelationshipGraph {
    let normalizer = Normalizer::default();
    let mut graph = RelationshipGraph::new();
    for (path, payload) in payloads {
        match normalizer.normalize(path, &RawAnalysis::from_value(payload.clone())) {
            Ok(normalized) => {
                graph.ingest_normalized(normalized);
            }
            Err(e) => assert!(e.is_malformed(), "unexpected error: {}", e),
        }
    }
    graph
}

fn file_a() -> (&'static str, Value) {
    (
        "a.py",
        json!({
            "functions": [{"name": "main", "description": "entry", "calls": ["helper"]}],
            "dependencies": ["b"],
            "entry_points": ["main"],
            "summary": "CLI entry point"
        }),
    )
}

fn file_b() -> (&'static str, Value) {
    (
        "b.py",
        json!({
            "functions": [{"name": "helper", "description": "does work", "calls": []}],
            "dependencies": ["os"],
            "summary": "Helpers"
        }),
    )
}

#[test]
fn test_main_calls_helper_across_files() {
    let graph = build(&[file_a(), file_b()]);

    assert_eq!(
        graph.resolved_edges(),
        vec![ResolvedEdge {
            from: "a.py::main".to_string(),
            to: "b.py::helper".to_string()
        }]
    );

    let paths = graph.trace_paths(DEFAULT_MAX_PATH_LENGTH);
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].nodes, vec!["a.py::main", "b.py::helper"]);
    assert!(!paths[0].is_truncated());
    assert!(!paths[0].is_cyclic());
}

#[test]
fn test_self_recursive_entry_point() {
    let graph = build(&[(
        "x.py",
        json!({"functions": [{"name": "loop", "calls": ["loop"]}], "entry_points": ["loop"]}),
    )]);

    let paths = graph.trace_paths(DEFAULT_MAX_PATH_LENGTH);
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].nodes, vec!["x.py::loop", "x.py::loop"]);
    assert_eq!(paths[0].len(), 2);
    assert!(paths[0].is_cyclic());
}

#[test]
fn test_malformed_payload_next_to_valid_file() {
    let graph = build(&[("broken.py", json!({})), file_b()]);

    assert!(graph.contains("b.py::helper"));
    assert!(graph.file("broken.py").is_none());
    assert!(graph.functions_in_file("broken.py").is_empty());
    assert_eq!(graph.file_count(), 1);
}

#[test]
fn test_ingesting_same_chunk_twice_is_idempotent() {
    let once = build(&[file_a(), file_b()]);
    let twice = build(&[file_a(), file_b(), file_a(), file_b()]);
    assert_eq!(once, twice);
}

#[test]
fn test_ingestion_order_does_not_change_relationships() {
    let forward = build(&[file_a(), file_b()]);
    let backward = build(&[file_b(), file_a()]);

    assert_eq!(forward.resolved_edges(), backward.resolved_edges());
    assert_eq!(
        forward.entry_points().iter().map(|f| &f.qualified_name).collect::<Vec<_>>(),
        backward.entry_points().iter().map(|f| &f.qualified_name).collect::<Vec<_>>()
    );
    for path in ["a.py", "b.py"] {
        assert_eq!(forward.file_dependencies(path), backward.file_dependencies(path));
    }
}

fn entry_names(graph: &RelationshipGraph) -> Vec<String> {
    graph.entry_points().iter().map(|f| f.qualified_name.clone()).collect()
}

#[test]
fn test_conventional_main_does_not_depend_on_chunking() {
    let whole = build(&[(
        "tool.py",
        json!({"functions": [{"name": "main"}, {"name": "run"}], "entry_points": ["run"]}),
    )]);
    let main_chunk = ("tool.py", json!({"functions": [{"name": "main"}]}));
    let run_chunk = ("tool.py", json!({"functions": [{"name": "run"}], "entry_points": ["run"]}));
    let chunked = build(&[main_chunk.clone(), run_chunk.clone()]);
    let reversed = build(&[run_chunk, main_chunk.clone()]);

    assert_eq!(entry_names(&whole), vec!["tool.py::run"]);
    assert_eq!(entry_names(&chunked), entry_names(&whole));
    assert_eq!(entry_names(&reversed), entry_names(&whole));
    assert_eq!(chunked, reversed);

    let undeclared = build(&[main_chunk]);
    assert_eq!(entry_names(&undeclared), vec!["tool.py::main"]);
}

#[test]
fn test_conflicting_chunks_only_differ_in_text() {
    let one = ("big.py", json!({"functions": [{"name": "run", "description": "v1", "calls": ["a"]}]}));
    let two = ("big.py", json!({"functions": [{"name": "run", "description": "v2", "calls": ["b"]}]}));
    let forward = build(&[one.clone(), two.clone()]);
    let backward = build(&[two, one]);

    assert_eq!(forward.function("big.py::run").unwrap().description, "v1");
    assert_eq!(backward.function("big.py::run").unwrap().description, "v2");

    let calls = |g: &RelationshipGraph| {
        let mut calls = g.function("big.py::run").unwrap().calls.clone();
        calls.sort();
        calls
    };
    assert_eq!(calls(&forward), calls(&backward));
}

#[test]
fn test_two_node_cycle_is_bounded() {
    let graph = build(&[(
        "m.py",
        json!({
            "functions": [{"name": "f1", "calls": ["f2"]}, {"name": "f2", "calls": ["f1"]}],
            "entry_points": ["f1"]
        }),
    )]);
    for max in [2, 3, 10] {
        let paths = graph.trace_paths(max);
        assert_eq!(paths.len(), 1);
        assert!(paths[0].len() <= max);
        assert!(paths[0].is_cyclic(), "max {} gave {:?}", max, paths[0]);
        assert_eq!(paths[0].cycle_start, Some(0));
    }
    let single = graph.trace_paths(1);
    assert_eq!(single[0].nodes, vec!["m.py::f1"]);
}

#[test]
fn test_paths_are_bounded_on_dense_graph() {
    let names: Vec<String> = (0..30).map(|i| format!("f{}", i)).collect();
    let functions: Vec<Value> = names
        .iter()
        .map(|n| json!({"name": n, "calls": names}))
        .collect();
    let entries: Vec<&String> = names.iter().step_by(5).collect();
    let graph = build(&[("dense.py", json!({"functions": functions, "entry_points": entries}))]);

    let paths = graph.trace_paths(12);
    assert_eq!(paths.len(), 6);
    for path in paths {
        assert!(path.len() <= 12);
        assert!(path.is_truncated());
    }
}

#[test]
fn test_unique_vs_ambiguous_cross_file_names() {
    let graph = build(&[
        ("a.py", json!({"functions": [{"name": "main", "calls": ["helper", "shared"]}]})),
        ("b.py", json!({"functions": [{"name": "helper"}, {"name": "shared"}]})),
        ("c.py", json!({"functions": [{"name": "shared"}]})),
    ]);

    assert_eq!(
        graph.resolve_call("a.py::main", "helper"),
        Some(CallResolution::Resolved("b.py::helper".to_string()))
    );
    assert!(matches!(
        graph.resolve_call("a.py::main", "shared"),
        Some(CallResolution::Ambiguous(_))
    ));
    assert_eq!(graph.summary().ambiguous_calls, 1);
    assert_eq!(graph.callees("a.py::main"), vec!["b.py::helper"]);
}

#[test]
fn test_query_surface() {
    let graph = build(&[file_a(), file_b()]);

    let main = graph.function("a.py::main").unwrap();
    assert_eq!(main.description, "entry");
    assert!(main.is_entry_point);

    assert_eq!(graph.callers("b.py::helper"), vec!["a.py::main"]);
    assert!(graph.callers("a.py::main").is_empty());
    assert_eq!(graph.file_dependencies("b.py"), vec!["os"]);
    assert_eq!(graph.file_call_dependencies("a.py"), vec!["b.py"]);

    let summary = graph.summary();
    assert_eq!(summary.total_files, 2);
    assert_eq!(summary.total_functions, 2);
    assert_eq!(summary.entry_points, 1);
    assert_eq!(summary.unresolved_ratio, 0.0);
}
