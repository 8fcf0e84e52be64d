// Command-line entry point for relgraph.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use relgraph::application::AnalyzeUsecase;
use relgraph::config::GraphConfig;
use relgraph::domain::PathTermination;
use relgraph::infrastructure::{JsonDirSource, JsonSnapshotStore};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory of analysis envelopes (*.json)
    analysis_dir: PathBuf,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write a graph snapshot to this path
    #[arg(short, long)]
    snapshot: Option<PathBuf>,

    /// Override the maximum execution path length
    #[arg(long)]
    max_depth: Option<usize>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => GraphConfig::load(path)?,
        None => GraphConfig::default(),
    };
    if let Some(depth) = cli.max_depth {
        config.max_path_length = depth.max(1);
    }

    let source = JsonDirSource::new(&cli.analysis_dir);
    let normalizer = config.normalizer();
    let usecase = AnalyzeUsecase {
        source: &source,
        normalizer: &normalizer,
        workers: config.workers,
    };

    let report = match &cli.snapshot {
        Some(path) => usecase.run_and_export(&JsonSnapshotStore, path)?,
        None => usecase.run()?,
    };

    let summary = report.graph.summary();
    println!("Files:            {}", summary.total_files);
    println!("Functions:        {}", summary.total_functions);
    println!("Dependencies:     {}", summary.total_dependencies);
    println!("Entry points:     {}", summary.entry_points);
    println!("Resolved edges:   {}", summary.resolved_edges);
    println!(
        "Unresolved calls: {} ({} ambiguous, {:.1}% of references)",
        summary.unresolved_calls + summary.ambiguous_calls,
        summary.ambiguous_calls,
        summary.unresolved_ratio * 100.0
    );
    if !report.skipped.is_empty() {
        println!("Skipped:          {} chunks in {} files", report.skipped.len(), report.skipped_files());
        for skipped in &report.skipped {
            println!("  - {} (chunk {}): {}", skipped.file_path, skipped.chunk, skipped.reason);
        }
    }

    println!();
    println!("Execution paths:");
    for path in report.graph.trace_paths(config.max_path_length) {
        let marker = match path.termination {
            PathTermination::Leaf => "",
            PathTermination::Cycle => " [cycle]",
            PathTermination::Truncated => " [truncated]",
            PathTermination::BrokenEntry => " [broken entry]",
        };
        println!("  {}{}", path.nodes.join(" -> "), marker);
    }

    Ok(())
}
