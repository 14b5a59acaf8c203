//! The single owner of a live workflow graph.
//!
//! Analysis never edits a graph in place. Edits made by the user go through
//! a [`WorkflowDocument`], and results computed elsewhere (for instance an
//! optimized graph) are applied as a whole-value replacement.

use crate::edge::Edge;
use crate::error::{ConnectionRejection, GraphError};
use crate::graph::WorkflowGraph;
use crate::node::Node;
use crate::validate::validate_connection;
use flowscope_core::{EdgeId, NodeId};
use std::fmt;
use tracing::{debug, info};

/// Errors from editing a [`WorkflowDocument`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// The connection was refused by the validator.
    Rejected(ConnectionRejection),
    /// The graph refused the change.
    Graph(GraphError),
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected(rejection) => write!(f, "connection rejected: {rejection}"),
            Self::Graph(error) => write!(f, "graph update failed: {error}"),
        }
    }
}

impl std::error::Error for DocumentError {}

impl From<ConnectionRejection> for DocumentError {
    fn from(rejection: ConnectionRejection) -> Self {
        Self::Rejected(rejection)
    }
}

impl From<GraphError> for DocumentError {
    fn from(error: GraphError) -> Self {
        Self::Graph(error)
    }
}

/// A live, editable workflow graph.
#[derive(Debug, Clone, Default)]
pub struct WorkflowDocument {
    graph: WorkflowGraph,
    revision: u64,
}

impl WorkflowDocument {
    /// Creates a document wrapping an existing graph.
    #[must_use]
    pub fn new(graph: WorkflowGraph) -> Self {
        Self { graph, revision: 0 }
    }

    /// Returns the current graph.
    #[must_use]
    pub fn graph(&self) -> &WorkflowGraph {
        &self.graph
    }

    /// Returns a copy of the current graph for handing to analysis.
    #[must_use]
    pub fn snapshot(&self) -> WorkflowGraph {
        self.graph.clone()
    }

    /// Number of successful edits applied so far.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Adds a node.
    ///
    /// # Errors
    ///
    /// Returns an error if the node ID is already taken.
    pub fn add_node(&mut self, node: Node) -> Result<NodeId, DocumentError> {
        let node_id = self.graph.add_node(node)?;
        self.bump();
        Ok(node_id)
    }

    /// Removes a node and every edge touching it.
    pub fn remove_node(&mut self, node_id: &NodeId) -> Option<Node> {
        let removed = self.graph.remove_node(node_id)?;
        self.bump();
        Some(removed)
    }

    /// Validates and inserts a user-proposed edge.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Rejected`] if the validator refuses the edge,
    /// or [`DocumentError::Graph`] if it violates a structural invariant.
    pub fn connect(&mut self, proposed: Edge) -> Result<EdgeId, DocumentError> {
        validate_connection(&self.graph, &proposed)?;
        let edge_id = self.graph.add_edge(proposed)?;
        self.bump();
        debug!(%edge_id, revision = self.revision, "edge connected");
        Ok(edge_id)
    }

    /// Removes an edge.
    pub fn disconnect(&mut self, edge_id: &EdgeId) -> Option<Edge> {
        let removed = self.graph.remove_edge(edge_id)?;
        self.bump();
        Some(removed)
    }

    /// Replaces the whole graph, e.g. with one returned by the optimizer.
    pub fn replace(&mut self, graph: WorkflowGraph) {
        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "replacing workflow graph"
        );
        self.graph = graph;
        self.bump();
    }

    fn bump(&mut self) {
        self.revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeConfig;

    fn document() -> WorkflowDocument {
        let mut doc = WorkflowDocument::default();
        doc.add_node(Node::with_id("t", "Start", NodeConfig::manual_trigger()))
            .unwrap();
        doc.add_node(Node::with_id("a", "Send", NodeConfig::action("send")))
            .unwrap();
        doc
    }

    #[test]
    fn connect_inserts_valid_edge() {
        let mut doc = document();
        let edge_id = doc.connect(Edge::with_id("e1", "t", "a")).unwrap();
        assert_eq!(edge_id.as_str(), "e1");
        assert_eq!(doc.graph().edge_count(), 1);
        assert_eq!(doc.revision(), 3);
    }

    #[test]
    fn connect_refuses_rejected_edge() {
        let mut doc = document();
        let err = doc.connect(Edge::with_id("e1", "a", "t")).unwrap_err();
        assert!(matches!(err, DocumentError::Rejected(_)));
        assert_eq!(doc.graph().edge_count(), 0);
        assert_eq!(doc.revision(), 2);
    }

    #[test]
    fn connect_refuses_duplicate_edge_id() {
        let mut doc = document();
        doc.connect(Edge::with_id("e1", "t", "a")).unwrap();
        let err = doc.connect(Edge::with_id("e1", "t", "a")).unwrap_err();
        assert!(matches!(err, DocumentError::Graph(GraphError::DuplicateEdge { .. })));
    }

    #[test]
    fn replace_swaps_whole_graph() {
        let mut doc = document();
        let snapshot = doc.snapshot();
        let optimized = snapshot.with_optimized([&NodeId::from("a")]);
        doc.replace(optimized);
        assert!(doc.graph().get_node(&NodeId::from("a")).unwrap().optimized);
        assert!(!snapshot.get_node(&NodeId::from("a")).unwrap().optimized);
    }

    #[test]
    fn disconnect_removes_edge() {
        let mut doc = document();
        doc.connect(Edge::with_id("e1", "t", "a")).unwrap();
        assert!(doc.disconnect(&EdgeId::from("e1")).is_some());
        assert!(doc.disconnect(&EdgeId::from("e1")).is_none());
        assert_eq!(doc.graph().edge_count(), 0);
    }

    #[test]
    fn disconnect_keeps_remaining_edges_in_order() {
        let mut doc = document();
        doc.add_node(Node::with_id("b", "Archive", NodeConfig::action("archive")))
            .unwrap();
        doc.connect(Edge::with_id("e1", "t", "a")).unwrap();
        doc.connect(Edge::with_id("e2", "t", "b")).unwrap();
        doc.connect(Edge::with_id("e3", "a", "b")).unwrap();

        doc.disconnect(&EdgeId::from("e1")).unwrap();
        let ids: Vec<_> = doc.graph().edges().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["e2", "e3"]);

        let mut rebuilt = WorkflowGraph::new();
        for node in doc.graph().nodes() {
            rebuilt.add_node(node.clone()).unwrap();
        }
        rebuilt.add_edge(Edge::with_id("e3", "a", "b")).unwrap();
        rebuilt.add_edge(Edge::with_id("e2", "t", "b")).unwrap();
        assert_eq!(doc.graph(), &rebuilt);
    }
}
