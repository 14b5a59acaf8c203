//! Structural analysis and simulated optimization of workflow graphs.
//!
//! The pipeline has three pure stages over an immutable graph:
//!
//! - **Detection** ([`detect`]): independent scanners that report [`Issue`]s
//! - **Estimation** ([`metrics`]): a synthetic cost model producing
//!   [`PerformanceMetrics`]
//! - **Optimization** ([`optimize`]): marks affected nodes and projects
//!   improved metrics with fixed ratios
//!
//! [`analyze_and_optimize`] runs all three. Every threshold and cost lives in
//! [`HeuristicsConfig`].

pub mod config;
pub mod detect;
pub mod error;
pub mod issue;
pub mod metrics;
pub mod optimize;
pub mod report;

pub use config::HeuristicsConfig;
pub use detect::{IssueDetector, Scanner};
pub use error::AnalysisError;
pub use issue::{Issue, IssueCategory, Severity};
pub use metrics::{Improvement, MetricEstimator, PerformanceMetrics, estimate};
pub use optimize::{OptimizationApplier, OptimizationOutcome};
pub use report::{AnalysisOutcome, AnalysisReport, analyze_and_optimize};
