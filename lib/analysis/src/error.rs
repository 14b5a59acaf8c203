//! Error types for the analysis crate.
//!
//! Analysis degrades to empty results on odd input rather than failing. The
//! one exception is a cyclic graph, which path-length analysis cannot handle.

use flowscope_core::NodeId;
use flowscope_workflow::GraphError;
use std::fmt;

/// Errors from analysing a workflow graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// The graph has a cycle, so chain lengths are unbounded.
    CycleDetected { node_id: NodeId },
    /// Any other graph-layer failure.
    Graph(GraphError),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CycleDetected { node_id } => write!(
                f,
                "cycle detected through node {node_id}; chain analysis needs an acyclic graph"
            ),
            Self::Graph(error) => write!(f, "graph error: {error}"),
        }
    }
}

impl std::error::Error for AnalysisError {}

impl From<GraphError> for AnalysisError {
    fn from(error: GraphError) -> Self {
        match error {
            GraphError::CycleDetected { node_id } => Self::CycleDetected { node_id },
            other => Self::Graph(other),
        }
    }
}
