//! Issues reported by the detectors.

use flowscope_core::{EdgeId, IssueId, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// What kind of problem an issue describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueCategory {
    /// Too many edges converge on one node.
    FanIn,
    /// A node is both a convergence and a divergence point.
    Hub,
    /// A node with no edges at all.
    Orphan,
    /// Two nodes of the same kind that look like the same step.
    SimilarNodes,
    /// A call to an external service.
    ExternalCall,
    /// Enough external calls to risk hitting rate limits.
    RateLimit,
    /// An overly long sequential chain.
    LongChain,
    /// Many collection-processing steps.
    MemoryIntensive,
}

impl IssueCategory {
    /// Returns the kebab-case name of this category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FanIn => "fan-in",
            Self::Hub => "hub",
            Self::Orphan => "orphan",
            Self::SimilarNodes => "similar-nodes",
            Self::ExternalCall => "external-call",
            Self::RateLimit => "rate-limit",
            Self::LongChain => "long-chain",
            Self::MemoryIntensive => "memory-intensive",
        }
    }
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How serious an issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        };
        f.write_str(name)
    }
}

/// A structural or performance concern found in a graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Deterministic ID of the form `<category>:<subject>`.
    pub id: IssueId,
    pub category: IssueCategory,
    pub severity: Severity,
    pub affected_node_ids: BTreeSet<NodeId>,
    pub affected_edge_ids: BTreeSet<EdgeId>,
    /// What was found, for humans.
    pub message: String,
    /// What to do about it, for humans.
    pub suggestion: String,
}

impl Issue {
    /// Creates an issue with no affected nodes or edges.
    #[must_use]
    pub fn new(
        category: IssueCategory,
        severity: Severity,
        subject: impl fmt::Display,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self {
            id: IssueId::from(format!("{category}:{subject}")),
            category,
            severity,
            affected_node_ids: BTreeSet::new(),
            affected_edge_ids: BTreeSet::new(),
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Adds affected nodes.
    #[must_use]
    pub fn with_nodes(mut self, nodes: impl IntoIterator<Item = NodeId>) -> Self {
        self.affected_node_ids.extend(nodes);
        self
    }

    /// Adds affected edges.
    #[must_use]
    pub fn with_edges(mut self, edges: impl IntoIterator<Item = EdgeId>) -> Self {
        self.affected_edge_ids.extend(edges);
        self
    }

    /// Returns true if this issue touches the given node.
    #[must_use]
    pub fn affects(&self, node_id: &NodeId) -> bool {
        self.affected_node_ids.contains(node_id)
    }
}
