//! Long sequential chain detection.

use super::Scanner;
use crate::config::HeuristicsConfig;
use crate::error::AnalysisError;
use crate::issue::{Issue, IssueCategory, Severity};
use flowscope_workflow::WorkflowGraph;

/// Flags workflows whose longest path has too many steps.
///
/// The graph is checked for cycles first; a cyclic graph is rejected with
/// [`AnalysisError::CycleDetected`] instead of being walked.
#[derive(Debug, Clone, Copy, Default)]
pub struct LongChainScanner;

impl Scanner for LongChainScanner {
    fn name(&self) -> &'static str {
        "long-chain"
    }

    fn scan(
        &self,
        graph: &WorkflowGraph,
        config: &HeuristicsConfig,
    ) -> Result<Vec<Issue>, AnalysisError> {
        let thresholds = &config.long_chain;
        let path = graph.longest_path()?;

        if path.len() <= thresholds.threshold {
            return Ok(Vec::new());
        }

        let severity = if path.len() > thresholds.high_above {
            Severity::High
        } else {
            Severity::Medium
        };
        let (first, last) = (path[0], path[path.len() - 1]);

        Ok(vec![
            Issue::new(
                IssueCategory::LongChain,
                severity,
                &first.id,
                format!(
                    "{} steps run one after another from '{}' to '{}'",
                    path.len(),
                    first.label,
                    last.label
                ),
                "Run independent steps in parallel or split the workflow",
            )
            .with_nodes(path.iter().map(|node| node.id.clone())),
        ])
    }
}
