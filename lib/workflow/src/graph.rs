//! Workflow graph implementation using petgraph.
//!
//! Workflows are directed graphs where:
//! - Nodes are workflow steps with typed ports
//! - Edges connect nodes, optionally pinning an output and an input port
//!
//! The graph travels between the editor and the analysis engine as a
//! [`GraphSnapshot`] (`{nodes, edges}`), which is also its serde form.

use crate::edge::Edge;
use crate::error::GraphError;
use crate::node::Node;
use flowscope_core::{EdgeId, NodeId};
use petgraph::Direction;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::{Bfs, EdgeRef};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::warn;

/// The plain `{nodes, edges}` form of a workflow graph.
///
/// This is what the editor produces and what gets persisted. It makes no
/// promises about integrity; converting it into a [`WorkflowGraph`] drops
/// anything that would violate the graph's invariants.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

/// A workflow graph using petgraph's directed graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "GraphSnapshot", into = "GraphSnapshot")]
pub struct WorkflowGraph {
    /// The underlying directed graph.
    graph: DiGraph<Node, Edge>,
    /// Map from NodeId to petgraph's NodeIndex for O(1) lookup.
    node_index_map: HashMap<NodeId, NodeIndex>,
}

impl WorkflowGraph {
    /// Creates a new empty workflow graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_index_map: HashMap::new(),
        }
    }

    /// Adds a node to the graph.
    ///
    /// # Errors
    ///
    /// Returns an error if a node with the same ID already exists.
    pub fn add_node(&mut self, node: Node) -> Result<NodeId, GraphError> {
        if self.node_index_map.contains_key(&node.id) {
            return Err(GraphError::DuplicateNode { node_id: node.id });
        }
        let node_id = node.id.clone();
        let index = self.graph.add_node(node);
        self.node_index_map.insert(node_id.clone(), index);
        Ok(node_id)
    }

    /// Removes a node from the graph.
    ///
    /// Also removes all edges connected to this node.
    pub fn remove_node(&mut self, node_id: &NodeId) -> Option<Node> {
        let removed = self.get_node(node_id)?.clone();
        self.rebuild_without(|node| node.id != *node_id, |_| true);
        Some(removed)
    }

    /// Returns a reference to a node by its ID.
    #[must_use]
    pub fn get_node(&self, node_id: &NodeId) -> Option<&Node> {
        let index = self.node_index_map.get(node_id)?;
        self.graph.node_weight(*index)
    }

    /// Returns true if the graph contains a node with this ID.
    #[must_use]
    pub fn contains_node(&self, node_id: &NodeId) -> bool {
        self.node_index_map.contains_key(node_id)
    }

    /// Adds an edge between two nodes.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An edge with the same ID already exists
    /// - Source or target node doesn't exist
    /// - A pinned source handle isn't an output port on the source node
    /// - A pinned target handle isn't an input port on the target node
    pub fn add_edge(&mut self, edge: Edge) -> Result<EdgeId, GraphError> {
        if self.find_edge_index(&edge.id).is_some() {
            return Err(GraphError::DuplicateEdge { edge_id: edge.id });
        }

        let source_index = *self
            .node_index_map
            .get(&edge.source)
            .ok_or_else(|| GraphError::NodeNotFound {
                node_id: edge.source.clone(),
            })?;
        let target_index = *self
            .node_index_map
            .get(&edge.target)
            .ok_or_else(|| GraphError::NodeNotFound {
                node_id: edge.target.clone(),
            })?;

        let source_node = &self.graph[source_index];
        let target_node = &self.graph[target_index];

        if let Some(handle) = &edge.source_handle {
            if source_node.output_port(handle).is_none() {
                return Err(GraphError::SourcePortNotFound {
                    node_id: edge.source.clone(),
                    port_id: handle.clone(),
                });
            }
        }

        if let Some(handle) = &edge.target_handle {
            if target_node.input_port(handle).is_none() {
                return Err(GraphError::TargetPortNotFound {
                    node_id: edge.target.clone(),
                    port_id: handle.clone(),
                });
            }
        }

        let edge_id = edge.id.clone();
        self.graph.add_edge(source_index, target_index, edge);
        Ok(edge_id)
    }

    /// Removes an edge by its ID.
    pub fn remove_edge(&mut self, edge_id: &EdgeId) -> Option<Edge> {
        let index = self.find_edge_index(edge_id)?;
        let removed = self.graph[index].clone();
        self.rebuild_without(|_| true, |edge| edge.id != *edge_id);
        Some(removed)
    }

    /// Returns all nodes in the graph, in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_weights()
    }

    /// Returns all edges in the graph, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.graph.edge_weights()
    }

    /// Returns the number of nodes in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of edges in the graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns the edges pointing into a node.
    pub fn incoming_edges(&self, node_id: &NodeId) -> Vec<&Edge> {
        self.directed_edges(node_id, Direction::Incoming)
    }

    /// Returns the edges leaving a node.
    pub fn outgoing_edges(&self, node_id: &NodeId) -> Vec<&Edge> {
        self.directed_edges(node_id, Direction::Outgoing)
    }

    /// Number of edges pointing into a node (fan-in).
    #[must_use]
    pub fn in_degree(&self, node_id: &NodeId) -> usize {
        self.degree(node_id, Direction::Incoming)
    }

    /// Number of edges leaving a node (fan-out).
    #[must_use]
    pub fn out_degree(&self, node_id: &NodeId) -> usize {
        self.degree(node_id, Direction::Outgoing)
    }

    /// Returns nodes that have no incoming edges (entry points).
    pub fn entry_nodes(&self) -> Vec<&Node> {
        self.graph
            .node_indices()
            .filter(|&idx| self.graph.edges_directed(idx, Direction::Incoming).count() == 0)
            .filter_map(|idx| self.graph.node_weight(idx))
            .collect()
    }

    /// Returns nodes that have no outgoing edges (terminal nodes).
    pub fn terminal_nodes(&self) -> Vec<&Node> {
        self.graph
            .node_indices()
            .filter(|&idx| self.graph.edges_directed(idx, Direction::Outgoing).count() == 0)
            .filter_map(|idx| self.graph.node_weight(idx))
            .collect()
    }

    /// Returns the successors (downstream nodes) of a given node.
    pub fn successors(&self, node_id: &NodeId) -> Vec<(&Node, &Edge)> {
        let Some(&index) = self.node_index_map.get(node_id) else {
            return Vec::new();
        };

        self.graph
            .edges_directed(index, Direction::Outgoing)
            .filter_map(|edge| {
                let target = self.graph.node_weight(edge.target())?;
                Some((target, edge.weight()))
            })
            .collect()
    }

    /// Returns the predecessors (upstream nodes) of a given node.
    pub fn predecessors(&self, node_id: &NodeId) -> Vec<(&Node, &Edge)> {
        let Some(&index) = self.node_index_map.get(node_id) else {
            return Vec::new();
        };

        self.graph
            .edges_directed(index, Direction::Incoming)
            .filter_map(|edge| {
                let source = self.graph.node_weight(edge.source())?;
                Some((source, edge.weight()))
            })
            .collect()
    }

    /// Returns the IDs of every node reachable from `node_id` by following
    /// edges forward. The start node is only included if it sits on a cycle.
    #[must_use]
    pub fn reachable_from(&self, node_id: &NodeId) -> BTreeSet<NodeId> {
        let Some(&start) = self.node_index_map.get(node_id) else {
            return BTreeSet::new();
        };

        let mut reached = BTreeSet::new();
        let mut bfs = Bfs::new(&self.graph, start);
        while let Some(index) = bfs.next(&self.graph) {
            if index != start {
                reached.insert(self.graph[index].id.clone());
            }
        }

        let on_cycle = self
            .graph
            .edges_directed(start, Direction::Incoming)
            .any(|edge| edge.source() == start || reached.contains(&self.graph[edge.source()].id));
        if on_cycle {
            reached.insert(node_id.clone());
        }
        reached
    }

    /// Returns true if the graph has no directed cycles.
    #[must_use]
    pub fn is_acyclic(&self) -> bool {
        !petgraph::algo::is_cyclic_directed(&self.graph)
    }

    /// Returns the nodes in a topological order.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::CycleDetected`] naming a node on a cycle.
    pub fn topological_order(&self) -> Result<Vec<&Node>, GraphError> {
        let order = petgraph::algo::toposort(&self.graph, None).map_err(|cycle| {
            GraphError::CycleDetected {
                node_id: self.graph[cycle.node_id()].id.clone(),
            }
        })?;
        Ok(order.into_iter().map(|idx| &self.graph[idx]).collect())
    }

    /// Returns the nodes on the longest path through the graph, in order.
    ///
    /// Every longest path starts at an entry node, so this is the longest
    /// chain reachable from any node without incoming edges. Runs in linear
    /// time over a topological order with no recursion. Ties go to the path
    /// found first.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::CycleDetected`] if the graph has a cycle.
    pub fn longest_path(&self) -> Result<Vec<&Node>, GraphError> {
        let order = petgraph::algo::toposort(&self.graph, None).map_err(|cycle| {
            GraphError::CycleDetected {
                node_id: self.graph[cycle.node_id()].id.clone(),
            }
        })?;

        // chain length ending at each node, plus the predecessor on that chain
        let mut best: HashMap<NodeIndex, (usize, Option<NodeIndex>)> =
            HashMap::with_capacity(order.len());
        let mut tail: Option<(usize, NodeIndex)> = None;

        for index in order {
            let mut entry = (1, None);
            for edge in self.graph.edges_directed(index, Direction::Incoming) {
                if let Some(&(len, _)) = best.get(&edge.source()) {
                    if len + 1 > entry.0 {
                        entry = (len + 1, Some(edge.source()));
                    }
                }
            }
            if tail.is_none_or(|(len, _)| entry.0 > len) {
                tail = Some((entry.0, index));
            }
            best.insert(index, entry);
        }

        let mut path = Vec::new();
        let mut cursor = tail.map(|(_, index)| index);
        while let Some(index) = cursor {
            path.push(&self.graph[index]);
            cursor = best.get(&index).and_then(|&(_, prev)| prev);
        }
        path.reverse();
        Ok(path)
    }

    /// Returns the number of nodes on the longest path through the graph.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::CycleDetected`] if the graph has a cycle.
    pub fn longest_path_len(&self) -> Result<usize, GraphError> {
        self.longest_path().map(|path| path.len())
    }

    /// Returns a copy of this graph with `optimized` set on the given nodes.
    ///
    /// Unknown IDs are ignored. Every other node, every edge and all IDs are
    /// carried over unchanged.
    #[must_use]
    pub fn with_optimized<'a>(&self, node_ids: impl IntoIterator<Item = &'a NodeId>) -> Self {
        let mut copy = self.clone();
        for node_id in node_ids {
            if let Some(&index) = copy.node_index_map.get(node_id) {
                copy.graph[index].optimized = true;
            }
        }
        copy
    }

    /// Validates the workflow graph.
    ///
    /// Checks:
    /// - All required input ports have incoming edges
    /// - No cycles (DAG validation)
    ///
    /// An incoming edge without a pinned target handle lands on the node's
    /// default input and satisfies any required port.
    ///
    /// # Errors
    ///
    /// Returns an error describing the validation failure.
    pub fn validate(&self) -> Result<(), GraphError> {
        for node in self.nodes() {
            let incoming = self.incoming_edges(&node.id);
            let has_unpinned = incoming.iter().any(|edge| edge.target_handle.is_none());
            let pinned: HashSet<&str> = incoming
                .iter()
                .filter_map(|edge| edge.target_handle.as_deref())
                .collect();

            for input in node.inputs() {
                if input.required && !has_unpinned && !pinned.contains(input.id.as_str()) {
                    return Err(GraphError::RequiredInputMissing {
                        node_id: node.id.clone(),
                        port_id: input.id.clone(),
                    });
                }
            }
        }

        self.topological_order().map(|_| ())
    }

    /// Returns the snapshot form of this graph.
    #[must_use]
    pub fn to_snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.graph.node_weights().cloned().collect(),
            edges: self.graph.edge_weights().cloned().collect(),
        }
    }

    /// Rebuilds the graph keeping only the matching nodes and edges.
    ///
    /// petgraph fills a removed slot with the last element, so removals go
    /// through a rebuild to keep indices in insertion order. Edges whose
    /// endpoints are dropped go with them.
    fn rebuild_without(
        &mut self,
        keep_node: impl Fn(&Node) -> bool,
        keep_edge: impl Fn(&Edge) -> bool,
    ) {
        let (nodes, edges) = std::mem::take(&mut self.graph).into_nodes_edges();

        let mut remap: HashMap<NodeIndex, NodeIndex> = HashMap::with_capacity(nodes.len());
        for (old, raw) in nodes.into_iter().enumerate() {
            if keep_node(&raw.weight) {
                remap.insert(NodeIndex::new(old), self.graph.add_node(raw.weight));
            }
        }

        for raw in edges {
            let endpoints = (remap.get(&raw.source()), remap.get(&raw.target()));
            if let (Some(&source), Some(&target)) = endpoints {
                if keep_edge(&raw.weight) {
                    self.graph.add_edge(source, target, raw.weight);
                }
            }
        }

        self.rebuild_index_map();
    }

    /// Rebuilds the node index map.
    fn rebuild_index_map(&mut self) {
        self.node_index_map.clear();
        for index in self.graph.node_indices() {
            if let Some(node) = self.graph.node_weight(index) {
                self.node_index_map.insert(node.id.clone(), index);
            }
        }
    }

    fn find_edge_index(&self, edge_id: &EdgeId) -> Option<EdgeIndex> {
        self.graph
            .edge_indices()
            .find(|&idx| self.graph[idx].id == *edge_id)
    }

    fn directed_edges(&self, node_id: &NodeId, direction: Direction) -> Vec<&Edge> {
        let Some(&index) = self.node_index_map.get(node_id) else {
            return Vec::new();
        };
        let mut edges: Vec<_> = self.graph.edges_directed(index, direction).collect();
        // petgraph walks adjacency lists newest-first
        edges.sort_by_key(|edge| edge.id());
        edges.into_iter().map(|edge| edge.weight()).collect()
    }

    fn degree(&self, node_id: &NodeId, direction: Direction) -> usize {
        self.node_index_map
            .get(node_id)
            .map_or(0, |&index| self.graph.edges_directed(index, direction).count())
    }
}

impl Default for WorkflowGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Graphs are equal when they hold the same nodes and edges by ID,
/// regardless of insertion order.
impl PartialEq for WorkflowGraph {
    fn eq(&self, other: &Self) -> bool {
        if self.node_count() != other.node_count() || self.edge_count() != other.edge_count() {
            return false;
        }
        let their_edges: HashMap<&EdgeId, &Edge> =
            other.edges().map(|edge| (&edge.id, edge)).collect();
        self.nodes()
            .all(|node| other.get_node(&node.id) == Some(node))
            && self
                .edges()
                .all(|edge| their_edges.get(&edge.id) == Some(&edge))
    }
}

impl From<GraphSnapshot> for WorkflowGraph {
    /// Builds a graph from a snapshot, dropping duplicate nodes and edges
    /// that violate the structural invariants.
    fn from(snapshot: GraphSnapshot) -> Self {
        let mut graph = Self::new();

        for node in snapshot.nodes {
            if let Err(error) = graph.add_node(node) {
                warn!(%error, "dropping node from snapshot");
            }
        }

        for edge in snapshot.edges {
            let edge_id = edge.id.clone();
            if let Err(error) = graph.add_edge(edge) {
                warn!(%edge_id, %error, "dropping edge from snapshot");
            }
        }

        graph
    }
}

impl From<WorkflowGraph> for GraphSnapshot {
    fn from(graph: WorkflowGraph) -> Self {
        graph.to_snapshot()
    }
}
