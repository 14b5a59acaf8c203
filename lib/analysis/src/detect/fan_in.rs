//! Bottleneck detection: fan-in and hub nodes.

use super::Scanner;
use crate::config::HeuristicsConfig;
use crate::error::AnalysisError;
use crate::issue::{Issue, IssueCategory, Severity};
use flowscope_workflow::WorkflowGraph;

/// Flags nodes where many edges converge.
///
/// A node with more incoming edges than the threshold gets a fan-in issue.
/// If it also has more outgoing edges than the hub threshold it gets a hub
/// issue as well; the two are reported independently.
#[derive(Debug, Clone, Copy, Default)]
pub struct FanInScanner;

impl Scanner for FanInScanner {
    fn name(&self) -> &'static str {
        "fan-in"
    }

    fn scan(
        &self,
        graph: &WorkflowGraph,
        config: &HeuristicsConfig,
    ) -> Result<Vec<Issue>, AnalysisError> {
        let thresholds = &config.fan_in;
        let mut issues = Vec::new();

        for node in graph.nodes() {
            let incoming = graph.incoming_edges(&node.id);
            if incoming.len() <= thresholds.threshold {
                continue;
            }

            let severity = if incoming.len() > thresholds.high_above {
                Severity::High
            } else {
                Severity::Medium
            };
            issues.push(
                Issue::new(
                    IssueCategory::FanIn,
                    severity,
                    &node.id,
                    format!(
                        "'{}' receives {} incoming connections and may become a bottleneck",
                        node.label,
                        incoming.len()
                    ),
                    "Batch the incoming data or merge upstream branches before this step",
                )
                .with_nodes([node.id.clone()])
                .with_edges(incoming.iter().map(|edge| edge.id.clone())),
            );

            let outgoing = graph.outgoing_edges(&node.id);
            if outgoing.len() > thresholds.hub_out_threshold {
                issues.push(
                    Issue::new(
                        IssueCategory::Hub,
                        Severity::High,
                        &node.id,
                        format!(
                            "'{}' is a hub with {} inputs and {} outputs",
                            node.label,
                            incoming.len(),
                            outgoing.len()
                        ),
                        "Split this step so inputs and outputs are handled by separate nodes",
                    )
                    .with_nodes([node.id.clone()])
                    .with_edges(
                        incoming
                            .iter()
                            .chain(outgoing.iter())
                            .map(|edge| edge.id.clone()),
                    ),
                );
            }
        }

        Ok(issues)
    }
}
