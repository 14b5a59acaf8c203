//! Edge types for workflow graphs.
//!
//! Edges connect two nodes. Each edge may pin the exact ports it uses:
//! - The source handle (an output port on the source node)
//! - The target handle (an input port on the target node)

use flowscope_core::{EdgeId, NodeId};
use serde::{Deserialize, Serialize};

/// A directed edge in a workflow graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Unique identifier for this edge.
    pub id: EdgeId,
    /// The node data flows out of.
    pub source: NodeId,
    /// The node data flows into.
    pub target: NodeId,
    /// The output port on the source node, if pinned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    /// The input port on the target node, if pinned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
}

impl Edge {
    /// Creates a new edge with a generated ID and no pinned ports.
    #[must_use]
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self::with_id(EdgeId::new(), source, target)
    }

    /// Creates a new edge with a specific ID and no pinned ports.
    #[must_use]
    pub fn with_id(
        id: impl Into<EdgeId>,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            source_handle: None,
            target_handle: None,
        }
    }

    /// Pins the source and target ports.
    #[must_use]
    pub fn via(mut self, source_handle: impl Into<String>, target_handle: impl Into<String>) -> Self {
        self.source_handle = Some(source_handle.into());
        self.target_handle = Some(target_handle.into());
        self
    }

    /// Pins the ports using default names ("output" -> "input").
    #[must_use]
    pub fn via_default_ports(self) -> Self {
        self.via("output", "input")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_edge_has_no_handles() {
        let edge = Edge::new("a", "b");
        assert_eq!(edge.source.as_str(), "a");
        assert_eq!(edge.target.as_str(), "b");
        assert!(edge.source_handle.is_none());
        assert!(edge.target_handle.is_none());
        assert!(edge.id.as_str().starts_with("edge_"));
    }

    #[test]
    fn edge_default_ports() {
        let edge = Edge::with_id("e1", "a", "b").via_default_ports();
        assert_eq!(edge.source_handle.as_deref(), Some("output"));
        assert_eq!(edge.target_handle.as_deref(), Some("input"));
    }

    #[test]
    fn unpinned_handles_are_omitted_from_json() {
        let edge = Edge::with_id("e1", "a", "b");
        let json = serde_json::to_value(&edge).expect("serialize");
        assert!(json.get("source_handle").is_none());
        let parsed: Edge = serde_json::from_value(json).expect("deserialize");
        assert_eq!(parsed, edge);
    }
}
