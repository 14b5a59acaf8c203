//! Simulated optimization.
//!
//! [`OptimizationApplier`] does not restructure the graph. It marks every
//! node an issue points at as `optimized`, records what a real optimization
//! would do for each issue, and scales the original estimate by fixed
//! improvement ratios. The resulting metrics are illustrative; they are not
//! re-derived from the returned graph.

use crate::config::{HeuristicsConfig, ImprovementRatios};
use crate::issue::{Issue, IssueCategory};
use crate::metrics::{MetricEstimator, PerformanceMetrics};
use flowscope_core::NodeId;
use flowscope_workflow::WorkflowGraph;
use std::collections::BTreeSet;
use tracing::{debug, instrument};

/// Result of applying optimizations to a graph.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationOutcome {
    /// A new graph with `optimized` set on every affected node.
    pub graph: WorkflowGraph,
    /// One description per issue, in issue order.
    pub applied_descriptions: Vec<String>,
    /// The original estimate scaled by the improvement ratios.
    pub metrics: PerformanceMetrics,
}

/// Returns the description of the fix applied for an issue category.
#[must_use]
pub const fn describe(category: IssueCategory) -> &'static str {
    match category {
        IssueCategory::FanIn => "Added batch processing to reduce bottlenecks",
        IssueCategory::Hub => "Split hub node into parallel branches",
        IssueCategory::Orphan => "Flagged disconnected node for removal",
        IssueCategory::SimilarNodes => "Merged duplicate operations",
        IssueCategory::ExternalCall => "Added response caching and retry with backoff",
        IssueCategory::RateLimit => "Added request throttling for external services",
        IssueCategory::LongChain => "Parallelized independent steps in the chain",
        IssueCategory::MemoryIntensive => "Switched to streaming data processing",
    }
}

/// Marks affected nodes and projects improved metrics.
#[derive(Debug, Clone, Default)]
pub struct OptimizationApplier {
    config: HeuristicsConfig,
}

impl OptimizationApplier {
    #[must_use]
    pub fn new(config: HeuristicsConfig) -> Self {
        Self { config }
    }

    /// Applies every issue to the graph, estimating the original metrics first.
    #[must_use]
    pub fn apply(&self, graph: &WorkflowGraph, issues: &[Issue]) -> OptimizationOutcome {
        let before = MetricEstimator::new(self.config.cost.clone()).estimate(graph, issues);
        self.apply_with_estimate(graph, issues, &before)
    }

    /// Applies every issue to the graph, scaling an existing estimate.
    ///
    /// The input graph is left untouched.
    #[must_use]
    #[instrument(skip_all, fields(issues = issues.len()))]
    pub fn apply_with_estimate(
        &self,
        graph: &WorkflowGraph,
        issues: &[Issue],
        before: &PerformanceMetrics,
    ) -> OptimizationOutcome {
        let applied_descriptions = issues
            .iter()
            .map(|issue| describe(issue.category).to_string())
            .collect();

        let touched: BTreeSet<&NodeId> = issues
            .iter()
            .flat_map(|issue| issue.affected_node_ids.iter())
            .collect();
        debug!(nodes = touched.len(), "marking nodes optimized");

        OptimizationOutcome {
            graph: graph.with_optimized(touched),
            applied_descriptions,
            metrics: project(before, &self.config.improvement),
        }
    }
}

/// Scales an estimate by the improvement ratios.
#[must_use]
pub fn project(before: &PerformanceMetrics, ratios: &ImprovementRatios) -> PerformanceMetrics {
    let api_calls = ratios
        .api_calls
        .apply(f64::from(before.api_call_count))
        .floor();

    PerformanceMetrics {
        estimated_execution_time_ms: ratios
            .execution_time
            .apply(before.estimated_execution_time_ms),
        estimated_memory_mb: ratios.memory.apply(before.estimated_memory_mb),
        // bounded above by the u32 it came from
        api_call_count: api_calls as u32,
        data_volume_kb: ratios.data_volume.apply(before.data_volume_kb),
        error_probability: ratios.error_probability.apply(before.error_probability),
        redundant_operation_count: 0,
    }
}
