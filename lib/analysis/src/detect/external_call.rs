//! External call and rate-limit detection.

use super::Scanner;
use crate::config::HeuristicsConfig;
use crate::error::AnalysisError;
use crate::issue::{Issue, IssueCategory, Severity};
use flowscope_workflow::{Node, NodeKind, WorkflowGraph};

const CACHE_AND_RETRY: &str =
    "Cache responses and add retry with exponential backoff around this call";

/// Flags integration nodes.
///
/// Every integration node gets a low-severity external-call issue. When
/// there are more of them than the rate-limit threshold, one extra issue
/// covering all of them is reported first.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExternalCallScanner;

impl Scanner for ExternalCallScanner {
    fn name(&self) -> &'static str {
        "external-call"
    }

    fn scan(
        &self,
        graph: &WorkflowGraph,
        config: &HeuristicsConfig,
    ) -> Result<Vec<Issue>, AnalysisError> {
        let thresholds = &config.external_calls;
        let integrations: Vec<&Node> = graph
            .nodes()
            .filter(|node| node.kind() == NodeKind::Integration)
            .collect();

        let mut issues = Vec::with_capacity(integrations.len() + 1);

        if integrations.len() > thresholds.rate_limit_threshold {
            let severity = if integrations.len() > thresholds.critical_above {
                Severity::Critical
            } else {
                Severity::High
            };
            issues.push(
                Issue::new(
                    IssueCategory::RateLimit,
                    severity,
                    "workflow",
                    format!(
                        "{} external service calls per run risk hitting rate limits",
                        integrations.len()
                    ),
                    "Throttle or batch requests to the same service",
                )
                .with_nodes(integrations.iter().map(|node| node.id.clone())),
            );
        }

        issues.extend(integrations.iter().map(|node| {
            Issue::new(
                IssueCategory::ExternalCall,
                Severity::Low,
                &node.id,
                format!("'{}' calls an external service", node.label),
                CACHE_AND_RETRY,
            )
            .with_nodes([node.id.clone()])
        }));

        Ok(issues)
    }
}
