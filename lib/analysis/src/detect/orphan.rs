//! Disconnected node detection.

use super::Scanner;
use crate::config::HeuristicsConfig;
use crate::error::AnalysisError;
use crate::issue::{Issue, IssueCategory, Severity};
use flowscope_workflow::WorkflowGraph;

/// Flags nodes with no incoming and no outgoing edges.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrphanScanner;

impl Scanner for OrphanScanner {
    fn name(&self) -> &'static str {
        "orphan"
    }

    fn scan(
        &self,
        graph: &WorkflowGraph,
        _config: &HeuristicsConfig,
    ) -> Result<Vec<Issue>, AnalysisError> {
        let issues = graph
            .nodes()
            .filter(|node| graph.in_degree(&node.id) + graph.out_degree(&node.id) == 0)
            .map(|node| {
                Issue::new(
                    IssueCategory::Orphan,
                    Severity::High,
                    &node.id,
                    format!("'{}' is not connected to the rest of the workflow", node.label),
                    "Connect this step or remove it",
                )
                .with_nodes([node.id.clone()])
            })
            .collect();
        Ok(issues)
    }
}
