//! Command implementations.
//!
//! Each command reads a graph snapshot, calls into the library crates and
//! returns the text to print. Printing and exit codes are left to `main`.

use crate::error::CliError;
use flowscope_analysis::{AnalysisOutcome, HeuristicsConfig, analyze_and_optimize};
use flowscope_core::{NodeId, Result};
use flowscope_workflow::{Edge, WorkflowGraph, validate_connection};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Reads and parses a graph snapshot file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a snapshot.
pub fn load_graph(path: &Path) -> Result<WorkflowGraph, CliError> {
    let contents = fs::read_to_string(path).map_err(|e| CliError::ReadFailed {
        path: path.to_path_buf(),
        details: e.to_string(),
    })?;
    let graph: WorkflowGraph =
        serde_json::from_str(&contents).map_err(|e| CliError::InvalidGraph {
            path: path.to_path_buf(),
            details: e.to_string(),
        })?;
    debug!(
        path = %path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "loaded graph"
    );
    Ok(graph)
}

/// Analyzes a graph and renders the report.
///
/// Writes the optimized graph to `graph_out` when given.
///
/// # Errors
///
/// Returns an error if analysis fails or output cannot be written.
pub fn analyze(
    graph: &WorkflowGraph,
    config: &HeuristicsConfig,
    graph_out: Option<&Path>,
    summary: bool,
) -> Result<String, CliError> {
    let AnalysisOutcome { report, graph } =
        analyze_and_optimize(graph, config).map_err(|report| CliError::AnalysisFailed {
            details: report.to_string(),
        })?;

    if let Some(path) = graph_out {
        let encoded = encode(&graph)?;
        fs::write(path, encoded).map_err(|e| CliError::WriteFailed {
            path: path.to_path_buf(),
            details: e.to_string(),
        })?;
        info!(path = %path.display(), "wrote optimized graph");
    }

    if summary {
        Ok(report.summary())
    } else {
        encode(&report)
    }
}

/// Verdict printed by `check-connection`.
#[derive(Debug, Serialize)]
pub struct ConnectionVerdict {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Checks whether a proposed edge would be accepted.
///
/// A rejection is a normal outcome, reported in the verdict.
///
/// # Errors
///
/// Returns an error only if the verdict cannot be encoded.
pub fn check_connection(
    graph: &WorkflowGraph,
    source: NodeId,
    target: NodeId,
    source_handle: Option<String>,
    target_handle: Option<String>,
) -> Result<String, CliError> {
    let mut edge = Edge::new(source, target);
    edge.source_handle = source_handle;
    edge.target_handle = target_handle;

    let verdict = match validate_connection(graph, &edge) {
        Ok(()) => ConnectionVerdict {
            ok: true,
            reason: None,
        },
        Err(rejection) => ConnectionVerdict {
            ok: false,
            reason: Some(rejection.to_string()),
        },
    };
    encode(&verdict)
}

/// Runs the structural check on a graph.
///
/// # Errors
///
/// Returns [`CliError::ValidationFailed`] describing the first problem found.
pub fn validate(graph: &WorkflowGraph) -> Result<String, CliError> {
    graph.validate().map_err(|e| CliError::ValidationFailed {
        details: e.to_string(),
    })?;
    Ok(format!(
        "ok: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    ))
}

fn encode<T: Serialize>(value: &T) -> Result<String, CliError> {
    Ok(
        serde_json::to_string_pretty(value).map_err(|e| CliError::EncodeFailed {
            details: e.to_string(),
        })?,
    )
}
