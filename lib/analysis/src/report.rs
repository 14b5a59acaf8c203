//! The combined detect, estimate, optimize pipeline.

use crate::config::HeuristicsConfig;
use crate::detect::IssueDetector;
use crate::error::AnalysisError;
use crate::issue::{Issue, Severity};
use crate::metrics::{Improvement, MetricEstimator, PerformanceMetrics};
use crate::optimize::OptimizationApplier;
use flowscope_workflow::WorkflowGraph;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use tracing::{info, instrument};

/// Everything one analysis run found and projected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub issues: Vec<Issue>,
    pub before: PerformanceMetrics,
    pub after: PerformanceMetrics,
    pub applied_descriptions: Vec<String>,
    pub improvement: Improvement,
}

impl AnalysisReport {
    /// Counts issues of the given severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == severity)
            .count()
    }

    /// Renders a short plain-text summary.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} issue(s): {} critical, {} high, {} medium, {} low",
            self.issues.len(),
            self.count(Severity::Critical),
            self.count(Severity::High),
            self.count(Severity::Medium),
            self.count(Severity::Low),
        );
        for issue in &self.issues {
            let _ = writeln!(out, "  [{}] {}: {}", issue.severity, issue.category, issue.message);
        }
        let _ = writeln!(
            out,
            "execution time: {:.0}ms -> {:.0}ms ({:.1}% faster)",
            self.before.estimated_execution_time_ms,
            self.after.estimated_execution_time_ms,
            self.improvement.execution_time_pct,
        );
        let _ = writeln!(
            out,
            "memory: {:.0}MB -> {:.0}MB, api calls: {} -> {}",
            self.before.estimated_memory_mb,
            self.after.estimated_memory_mb,
            self.before.api_call_count,
            self.after.api_call_count,
        );
        let _ = write!(
            out,
            "error probability: {:.1}% -> {:.1}%",
            self.before.error_probability * 100.0,
            self.after.error_probability * 100.0,
        );
        out
    }
}

/// A report plus the graph with affected nodes marked optimized.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    pub report: AnalysisReport,
    /// A new graph; the caller decides whether to replace its own with it.
    pub graph: WorkflowGraph,
}

/// Detects issues, estimates metrics, applies the simulated optimization and
/// estimates again.
///
/// The input graph is never modified.
///
/// # Errors
///
/// Fails with [`AnalysisError::CycleDetected`] if the graph has a cycle.
#[instrument(skip_all, fields(nodes = graph.node_count(), edges = graph.edge_count()))]
pub fn analyze_and_optimize(
    graph: &WorkflowGraph,
    config: &HeuristicsConfig,
) -> flowscope_core::Result<AnalysisOutcome, AnalysisError> {
    let issues = IssueDetector::new(config.clone()).detect(graph)?;
    let before = MetricEstimator::new(config.cost.clone()).estimate(graph, &issues);
    let optimized =
        OptimizationApplier::new(config.clone()).apply_with_estimate(graph, &issues, &before);
    let after = optimized.metrics;

    let improvement = Improvement::between(&before, &after);
    info!(
        issues = issues.len(),
        before_ms = before.estimated_execution_time_ms,
        after_ms = after.estimated_execution_time_ms,
        "analysis complete"
    );

    Ok(AnalysisOutcome {
        report: AnalysisReport {
            issues,
            before,
            after,
            applied_descriptions: optimized.applied_descriptions,
            improvement,
        },
        graph: optimized.graph,
    })
}
