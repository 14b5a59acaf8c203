//! Tunable heuristics for detection and estimation.
//!
//! Every threshold, cost and ratio the engine uses lives here, so callers can
//! adjust the heuristics without touching detector code. All fields have
//! defaults; a partial config file only overrides what it names.
//!
//! None of these numbers are measurements. They are order-of-magnitude
//! placeholders chosen to rank graphs against each other.

use crate::issue::{IssueCategory, Severity};
use flowscope_workflow::NodeKind;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// All heuristics used by the analysis engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicsConfig {
    pub fan_in: FanInThresholds,
    pub external_calls: ExternalCallThresholds,
    pub similarity: SimilarityThresholds,
    pub long_chain: LongChainThresholds,
    pub memory: MemoryThresholds,
    pub cost: CostModel,
    pub improvement: ImprovementRatios,
}

/// Fan-in and hub detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FanInThresholds {
    /// A node with more incoming edges than this gets a fan-in issue.
    pub threshold: usize,
    /// Fan-in above this is high severity, otherwise medium.
    pub high_above: usize,
    /// A fan-in node with more outgoing edges than this is also a hub.
    pub hub_out_threshold: usize,
}

impl Default for FanInThresholds {
    fn default() -> Self {
        Self {
            threshold: 2,
            high_above: 4,
            hub_out_threshold: 2,
        }
    }
}

/// External call and rate-limit detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalCallThresholds {
    /// More integration nodes than this raises a rate-limit issue.
    pub rate_limit_threshold: usize,
    /// More integration nodes than this makes the rate-limit issue critical.
    pub critical_above: usize,
}

impl Default for ExternalCallThresholds {
    fn default() -> Self {
        Self {
            rate_limit_threshold: 3,
            critical_above: 5,
        }
    }
}

/// Redundant-node detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityThresholds {
    /// Labels whose edit distance is strictly below this are similar.
    pub max_edit_distance: usize,
}

impl Default for SimilarityThresholds {
    fn default() -> Self {
        Self {
            max_edit_distance: 5,
        }
    }
}

/// Long sequential chain detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LongChainThresholds {
    /// A longest path with more nodes than this raises an issue.
    pub threshold: usize,
    /// A longest path with more nodes than this is high severity.
    pub high_above: usize,
}

impl Default for LongChainThresholds {
    fn default() -> Self {
        Self {
            threshold: 10,
            high_above: 15,
        }
    }
}

/// Memory-intensive workflow detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryThresholds {
    /// Node kinds that hold whole collections in memory.
    pub intensive_kinds: BTreeSet<NodeKind>,
    /// More such nodes than this raises an issue.
    pub threshold: usize,
}

impl Default for MemoryThresholds {
    fn default() -> Self {
        Self {
            intensive_kinds: [NodeKind::Transform, NodeKind::Aggregate, NodeKind::Filter]
                .into_iter()
                .collect(),
            threshold: 4,
        }
    }
}

/// Time penalty added per issue, by severity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityPenalties {
    pub low_ms: f64,
    pub medium_ms: f64,
    pub high_ms: f64,
    pub critical_ms: f64,
}

impl SeverityPenalties {
    /// Returns the penalty for the given severity.
    #[must_use]
    pub fn for_severity(&self, severity: Severity) -> f64 {
        match severity {
            Severity::Low => self.low_ms,
            Severity::Medium => self.medium_ms,
            Severity::High => self.high_ms,
            Severity::Critical => self.critical_ms,
        }
    }
}

impl Default for SeverityPenalties {
    fn default() -> Self {
        Self {
            low_ms: 50.0,
            medium_ms: 50.0,
            high_ms: 150.0,
            critical_ms: 300.0,
        }
    }
}

/// Error probability model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorModel {
    pub base: f64,
    pub per_critical_issue: f64,
    pub per_high_issue: f64,
    /// Added once if any orphan issue exists.
    pub orphan_penalty: f64,
    pub max: f64,
}

impl Default for ErrorModel {
    fn default() -> Self {
        Self {
            base: 0.01,
            per_critical_issue: 0.2,
            per_high_issue: 0.1,
            orphan_penalty: 0.2,
            max: 0.99,
        }
    }
}

/// The synthetic cost model behind [`PerformanceMetrics`](crate::PerformanceMetrics).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostModel {
    /// Base execution time per node kind.
    pub base_cost_ms: BTreeMap<NodeKind, f64>,
    /// Base execution time for kinds missing from `base_cost_ms`.
    pub default_cost_ms: f64,
    /// Connection overhead per edge.
    pub edge_overhead_ms: f64,
    pub severity_penalties: SeverityPenalties,
    /// Only issues in these categories add a time penalty.
    pub penalized_categories: BTreeSet<IssueCategory>,
    pub memory_per_node_mb: f64,
    pub memory_per_edge_mb: f64,
    /// Data moved across each edge.
    pub data_per_edge_kb: f64,
    pub error: ErrorModel,
}

impl CostModel {
    /// Returns the base execution time for a node kind.
    #[must_use]
    pub fn base_cost(&self, kind: NodeKind) -> f64 {
        self.base_cost_ms
            .get(&kind)
            .copied()
            .unwrap_or(self.default_cost_ms)
    }

    /// Returns the time penalty an issue adds, or zero if its category is
    /// not penalized.
    #[must_use]
    pub fn penalty(&self, category: IssueCategory, severity: Severity) -> f64 {
        if self.penalized_categories.contains(&category) {
            self.severity_penalties.for_severity(severity)
        } else {
            0.0
        }
    }
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            base_cost_ms: [
                (NodeKind::Trigger, 50.0),
                (NodeKind::Action, 100.0),
                (NodeKind::Condition, 20.0),
                (NodeKind::Data, 30.0),
                (NodeKind::Integration, 500.0),
                (NodeKind::Agent, 300.0),
            ]
            .into_iter()
            .collect(),
            default_cost_ms: 100.0,
            edge_overhead_ms: 10.0,
            severity_penalties: SeverityPenalties::default(),
            penalized_categories: [IssueCategory::FanIn, IssueCategory::Hub]
                .into_iter()
                .collect(),
            memory_per_node_mb: 5.0,
            memory_per_edge_mb: 2.0,
            data_per_edge_kb: 10.0,
            error: ErrorModel::default(),
        }
    }
}

/// A multiplicative improvement with a lower bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ratio {
    pub factor: f64,
    pub floor: f64,
}

impl Ratio {
    #[must_use]
    pub const fn new(factor: f64, floor: f64) -> Self {
        Self { factor, floor }
    }

    /// Scales `value` by the factor, clamped to the floor. The floor never
    /// lifts a value above where it started.
    #[must_use]
    pub fn apply(self, value: f64) -> f64 {
        (value * self.factor).max(self.floor).min(value)
    }
}

/// Fixed improvement ratios used by the simulated optimizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImprovementRatios {
    pub execution_time: Ratio,
    pub memory: Ratio,
    pub api_calls: Ratio,
    pub error_probability: Ratio,
    pub data_volume: Ratio,
}

impl Default for ImprovementRatios {
    fn default() -> Self {
        Self {
            execution_time: Ratio::new(0.7, 50.0),
            memory: Ratio::new(0.8, 5.0),
            api_calls: Ratio::new(0.6, 1.0),
            error_probability: Ratio::new(0.5, 0.01),
            data_volume: Ratio::new(1.0, 0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_cost_falls_back_to_default() {
        let cost = CostModel::default();
        assert_eq!(cost.base_cost(NodeKind::Integration), 500.0);
        assert_eq!(cost.base_cost(NodeKind::Filter), 100.0);
    }

    #[test]
    fn only_fan_in_family_is_penalized_by_default() {
        let cost = CostModel::default();
        assert_eq!(cost.penalty(IssueCategory::Hub, Severity::High), 150.0);
        assert_eq!(cost.penalty(IssueCategory::FanIn, Severity::Critical), 300.0);
        assert_eq!(cost.penalty(IssueCategory::FanIn, Severity::Medium), 50.0);
        assert_eq!(cost.penalty(IssueCategory::Orphan, Severity::High), 0.0);
    }

    #[test]
    fn ratio_respects_floor_and_start() {
        let ratio = Ratio::new(0.7, 50.0);
        assert!((ratio.apply(1000.0) - 700.0).abs() < 1e-9);
        assert_eq!(ratio.apply(60.0), 50.0);
        assert_eq!(ratio.apply(20.0), 20.0);
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config: HeuristicsConfig =
            serde_json::from_str(r#"{"fan_in":{"threshold":5}}"#).expect("deserialize");
        assert_eq!(config.fan_in.threshold, 5);
        assert_eq!(config.fan_in.high_above, 4);
        assert_eq!(config.long_chain.threshold, 10);
    }

    #[test]
    fn kind_keyed_costs_deserialize() {
        let config: CostModel = serde_json::from_str(r#"{"base_cost_ms":{"filter":5.0}}"#)
            .expect("deserialize");
        assert_eq!(config.base_cost(NodeKind::Filter), 5.0);
        // replacing the table drops the other entries
        assert_eq!(config.base_cost(NodeKind::Integration), 100.0);
    }
}
