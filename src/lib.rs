// Main library entry point for relgraph.
//
// Aggregates per-file, AI-produced code descriptions into one relationship
// graph: call edges, entry points, execution paths and summary statistics.

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ports;
