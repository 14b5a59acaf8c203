//! Synthetic performance estimation.
//!
//! The numbers produced here rank graphs against each other; they are not
//! predictions of real runtime, memory use or failure rates.

use crate::config::{CostModel, HeuristicsConfig};
use crate::issue::{Issue, IssueCategory, Severity};
use flowscope_workflow::{NodeKind, WorkflowGraph};
use serde::{Deserialize, Serialize};

/// Estimated cost of running a workflow once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub estimated_execution_time_ms: f64,
    /// Order-of-magnitude placeholder, not a physical measurement.
    pub estimated_memory_mb: f64,
    pub api_call_count: u32,
    pub data_volume_kb: f64,
    /// Between 0 and 1.
    pub error_probability: f64,
    pub redundant_operation_count: u32,
}

/// Percentage reduction of each metric between two estimates.
///
/// A metric that was already zero reports 0% rather than NaN.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Improvement {
    pub execution_time_pct: f64,
    pub memory_pct: f64,
    pub api_calls_pct: f64,
    pub data_volume_pct: f64,
    pub error_probability_pct: f64,
    pub redundant_operations_pct: f64,
}

impl Improvement {
    /// Compares two estimates.
    #[must_use]
    pub fn between(before: &PerformanceMetrics, after: &PerformanceMetrics) -> Self {
        Self {
            execution_time_pct: reduction_pct(
                before.estimated_execution_time_ms,
                after.estimated_execution_time_ms,
            ),
            memory_pct: reduction_pct(before.estimated_memory_mb, after.estimated_memory_mb),
            api_calls_pct: reduction_pct(
                f64::from(before.api_call_count),
                f64::from(after.api_call_count),
            ),
            data_volume_pct: reduction_pct(before.data_volume_kb, after.data_volume_kb),
            error_probability_pct: reduction_pct(
                before.error_probability,
                after.error_probability,
            ),
            redundant_operations_pct: reduction_pct(
                f64::from(before.redundant_operation_count),
                f64::from(after.redundant_operation_count),
            ),
        }
    }
}

/// Returns how much smaller `after` is than `before`, in percent.
#[must_use]
pub fn reduction_pct(before: f64, after: f64) -> f64 {
    if before == 0.0 {
        return 0.0;
    }
    (before - after) / before * 100.0
}

/// Computes [`PerformanceMetrics`] from a graph and its issues.
#[derive(Debug, Clone, Default)]
pub struct MetricEstimator {
    cost: CostModel,
}

impl MetricEstimator {
    #[must_use]
    pub fn new(cost: CostModel) -> Self {
        Self { cost }
    }

    /// Estimates the cost of one run. Deterministic for the same input.
    #[must_use]
    pub fn estimate(&self, graph: &WorkflowGraph, issues: &[Issue]) -> PerformanceMetrics {
        let cost = &self.cost;
        let node_count = graph.node_count() as f64;
        let edge_count = graph.edge_count() as f64;

        let node_time: f64 = graph.nodes().map(|node| cost.base_cost(node.kind())).sum();
        let penalty_time: f64 = issues
            .iter()
            .map(|issue| cost.penalty(issue.category, issue.severity))
            .sum();

        let api_call_count = graph
            .nodes()
            .filter(|node| node.kind() == NodeKind::Integration)
            .count();

        PerformanceMetrics {
            estimated_execution_time_ms: node_time
                + cost.edge_overhead_ms * edge_count
                + penalty_time,
            estimated_memory_mb: cost.memory_per_node_mb * node_count
                + cost.memory_per_edge_mb * edge_count,
            api_call_count: saturating_u32(api_call_count),
            data_volume_kb: cost.data_per_edge_kb * edge_count,
            error_probability: self.error_probability(issues),
            redundant_operation_count: saturating_u32(
                issues
                    .iter()
                    .filter(|issue| issue.category == IssueCategory::SimilarNodes)
                    .count(),
            ),
        }
    }

    fn error_probability(&self, issues: &[Issue]) -> f64 {
        let model = &self.cost.error;
        let count = |severity: Severity| {
            issues.iter().filter(|issue| issue.severity == severity).count() as f64
        };
        let orphan = if issues
            .iter()
            .any(|issue| issue.category == IssueCategory::Orphan)
        {
            model.orphan_penalty
        } else {
            0.0
        };

        (model.base
            + model.per_critical_issue * count(Severity::Critical)
            + model.per_high_issue * count(Severity::High)
            + orphan)
            .min(model.max)
    }
}

/// Estimates metrics with the given heuristics.
#[must_use]
pub fn estimate(
    graph: &WorkflowGraph,
    issues: &[Issue],
    config: &HeuristicsConfig,
) -> PerformanceMetrics {
    MetricEstimator::new(config.cost.clone()).estimate(graph, issues)
}

fn saturating_u32(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::{
        self,
        fixtures::{action, graph_with},
    };
    use flowscope_workflow::{Node, NodeConfig};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn empty_graph_costs_nothing_but_base_error() {
        let metrics = MetricEstimator::default().estimate(&WorkflowGraph::new(), &[]);
        assert_eq!(metrics.estimated_execution_time_ms, 0.0);
        assert_eq!(metrics.estimated_memory_mb, 0.0);
        assert_eq!(metrics.api_call_count, 0);
        assert!(approx(metrics.error_probability, 0.01));
    }

    #[test]
    fn sums_node_costs_and_edge_overhead() {
        let graph = graph_with(
            vec![
                Node::with_id("t", "Start", NodeConfig::manual_trigger()),
                action("a"),
                Node::with_id("api", "Call", NodeConfig::integration("http", "get")),
            ],
            &[("t", "a"), ("a", "api")],
        );
        let metrics = MetricEstimator::default().estimate(&graph, &[]);
        // 50 + 100 + 500 + 2 * 10
        assert!(approx(metrics.estimated_execution_time_ms, 670.0));
        // 3 * 5 + 2 * 2
        assert!(approx(metrics.estimated_memory_mb, 19.0));
        assert_eq!(metrics.api_call_count, 1);
        assert!(approx(metrics.data_volume_kb, 20.0));
    }

    #[test]
    fn only_penalized_categories_add_time() {
        let fan_in = Issue::new(IssueCategory::FanIn, Severity::High, "x", "", "");
        let orphan = Issue::new(IssueCategory::Orphan, Severity::High, "y", "", "");
        let metrics = MetricEstimator::default().estimate(&WorkflowGraph::new(), &[fan_in, orphan]);
        assert!(approx(metrics.estimated_execution_time_ms, 150.0));
    }

    #[test]
    fn error_probability_formula() {
        let issues = vec![
            Issue::new(IssueCategory::RateLimit, Severity::Critical, "w", "", ""),
            Issue::new(IssueCategory::Hub, Severity::High, "h", "", ""),
            Issue::new(IssueCategory::Orphan, Severity::High, "o", "", ""),
        ];
        let metrics = MetricEstimator::default().estimate(&WorkflowGraph::new(), &issues);
        // 0.01 + 0.2 + 0.1 * 2 + 0.2
        assert!(approx(metrics.error_probability, 0.61));
    }

    #[test]
    fn error_probability_is_capped() {
        let issues: Vec<_> = (0..10)
            .map(|i| Issue::new(IssueCategory::RateLimit, Severity::Critical, i, "", ""))
            .collect();
        let metrics = MetricEstimator::default().estimate(&WorkflowGraph::new(), &issues);
        assert_eq!(metrics.error_probability, 0.99);
    }

    #[test]
    fn counts_similar_pairs_as_redundant() {
        let issues = vec![
            Issue::new(IssueCategory::SimilarNodes, Severity::Medium, "a+b", "", ""),
            Issue::new(IssueCategory::SimilarNodes, Severity::Medium, "a+c", "", ""),
        ];
        let metrics = MetricEstimator::default().estimate(&WorkflowGraph::new(), &issues);
        assert_eq!(metrics.redundant_operation_count, 2);
    }

    #[test]
    fn estimate_is_bit_identical_across_calls() {
        let graph = graph_with(
            vec![action("a"), action("b"), action("c"), action("d"), action("lonely")],
            &[("a", "d"), ("b", "d"), ("c", "d")],
        );
        let config = HeuristicsConfig::default();
        let first = estimate(&graph, &detect::detect(&graph, &config).unwrap(), &config);
        let second = estimate(&graph, &detect::detect(&graph, &config).unwrap(), &config);
        assert_eq!(
            first.estimated_execution_time_ms.to_bits(),
            second.estimated_execution_time_ms.to_bits()
        );
        assert_eq!(first.error_probability.to_bits(), second.error_probability.to_bits());
        assert_eq!(first, second);
    }

    #[test]
    fn zero_before_means_zero_improvement() {
        assert_eq!(reduction_pct(0.0, 0.0), 0.0);
        assert!(approx(reduction_pct(200.0, 150.0), 25.0));

        let before = PerformanceMetrics {
            estimated_execution_time_ms: 1000.0,
            ..PerformanceMetrics::default()
        };
        let after = PerformanceMetrics {
            estimated_execution_time_ms: 700.0,
            ..PerformanceMetrics::default()
        };
        let improvement = Improvement::between(&before, &after);
        assert!(approx(improvement.execution_time_pct, 30.0));
        assert_eq!(improvement.api_calls_pct, 0.0);
        assert!(!improvement.memory_pct.is_nan());
    }
}
