//! Error types for the workflow crate.
//!
//! Errors are designed for layered context using rootcause:
//! - `GraphError`: Low-level graph operations (nodes, ports, edges)
//! - `ConnectionRejection`: Why a user-proposed connection was refused

use flowscope_core::{EdgeId, NodeId};
use std::fmt;

/// Errors from graph operations.
///
/// These errors contain only information available at the graph layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// Node with the given ID was not found in the graph.
    NodeNotFound { node_id: NodeId },
    /// A node with the given ID already exists.
    DuplicateNode { node_id: NodeId },
    /// An edge with the given ID already exists.
    DuplicateEdge { edge_id: EdgeId },
    /// Source handle does not name an output port on the source node.
    SourcePortNotFound { node_id: NodeId, port_id: String },
    /// Target handle does not name an input port on the target node.
    TargetPortNotFound { node_id: NodeId, port_id: String },
    /// A required input port has no incoming edge.
    RequiredInputMissing { node_id: NodeId, port_id: String },
    /// Graph contains a cycle through the given node.
    CycleDetected { node_id: NodeId },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NodeNotFound { node_id } => write!(f, "node not found: {node_id}"),
            Self::DuplicateNode { node_id } => write!(f, "duplicate node id: {node_id}"),
            Self::DuplicateEdge { edge_id } => write!(f, "duplicate edge id: {edge_id}"),
            Self::SourcePortNotFound { node_id, port_id } => {
                write!(f, "output port '{port_id}' not found on node {node_id}")
            }
            Self::TargetPortNotFound { node_id, port_id } => {
                write!(f, "input port '{port_id}' not found on node {node_id}")
            }
            Self::RequiredInputMissing { node_id, port_id } => {
                write!(
                    f,
                    "required input port '{port_id}' on node {node_id} has no incoming edge"
                )
            }
            Self::CycleDetected { node_id } => {
                write!(f, "cycle detected through node {node_id}")
            }
        }
    }
}

impl std::error::Error for GraphError {}

/// Reasons a proposed connection is refused.
///
/// The `Display` text is the user-facing reason shown by the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionRejection {
    /// Source or target node does not exist.
    UnknownEndpoint { node_id: NodeId },
    /// The target is a trigger; triggers accept no inbound edges.
    TriggerTarget { node_id: NodeId },
    /// The pinned ports carry incompatible data types, or a pinned port
    /// does not resolve.
    IncompatibleDataTypes { source_port: String, target_port: String },
    /// The target port restricts which node kinds may feed it.
    SourceKindNotPermitted { source_kind: String, target_port: String },
}

impl fmt::Display for ConnectionRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::UnknownEndpoint { .. } => "unknown endpoint",
            Self::TriggerTarget { .. } => "triggers cannot receive connections",
            Self::IncompatibleDataTypes { .. } => "incompatible data types",
            Self::SourceKindNotPermitted { .. } => "source kind not permitted",
        };
        f.write_str(reason)
    }
}

impl std::error::Error for ConnectionRejection {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_error_display() {
        let err = GraphError::NodeNotFound {
            node_id: NodeId::from("n1"),
        };
        assert_eq!(err.to_string(), "node not found: n1");
    }

    #[test]
    fn cycle_error_mentions_cycle() {
        let err = GraphError::CycleDetected {
            node_id: NodeId::from("loop"),
        };
        assert!(err.to_string().contains("cycle detected"));
        assert!(err.to_string().contains("loop"));
    }

    #[test]
    fn rejection_reasons_are_stable() {
        let node_id = NodeId::from("t");
        assert_eq!(
            ConnectionRejection::UnknownEndpoint {
                node_id: node_id.clone()
            }
            .to_string(),
            "unknown endpoint"
        );
        assert_eq!(
            ConnectionRejection::TriggerTarget { node_id }.to_string(),
            "triggers cannot receive connections"
        );
        assert_eq!(
            ConnectionRejection::IncompatibleDataTypes {
                source_port: "out".to_string(),
                target_port: "in".to_string(),
            }
            .to_string(),
            "incompatible data types"
        );
        assert_eq!(
            ConnectionRejection::SourceKindNotPermitted {
                source_kind: "agent".to_string(),
                target_port: "in".to_string(),
            }
            .to_string(),
            "source kind not permitted"
        );
    }
}
