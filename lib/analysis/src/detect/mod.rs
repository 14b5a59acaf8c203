//! Issue detection.
//!
//! Detection is a pipeline of independent [`Scanner`]s. Each one reads the
//! graph and returns its own issues; none depends on another's output. The
//! [`IssueDetector`] runs them in a fixed order so results are reproducible:
//!
//! 1. fan-in / hub
//! 2. external calls / rate limit
//! 3. orphans
//! 4. similar nodes
//! 5. long chains
//! 6. memory-intensive steps

mod external_call;
mod fan_in;
mod long_chain;
mod memory;
mod orphan;
mod similarity;

pub use external_call::ExternalCallScanner;
pub use fan_in::FanInScanner;
pub use long_chain::LongChainScanner;
pub use memory::MemoryScanner;
pub use orphan::OrphanScanner;
pub use similarity::{SimilarityScanner, labels_similar, levenshtein};

use crate::config::HeuristicsConfig;
use crate::error::AnalysisError;
use crate::issue::Issue;
use flowscope_workflow::WorkflowGraph;
use tracing::{debug, instrument};

/// One independent check over a workflow graph.
pub trait Scanner: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Scans the graph and returns any issues found, or an empty list.
    ///
    /// # Errors
    ///
    /// Only fails when the graph cannot be analysed at all (a cycle for
    /// path-length scanners).
    fn scan(
        &self,
        graph: &WorkflowGraph,
        config: &HeuristicsConfig,
    ) -> Result<Vec<Issue>, AnalysisError>;
}

/// Runs every scanner over a graph.
pub struct IssueDetector {
    config: HeuristicsConfig,
    scanners: Vec<Box<dyn Scanner>>,
}

impl IssueDetector {
    /// Creates a detector with the standard scanners.
    #[must_use]
    pub fn new(config: HeuristicsConfig) -> Self {
        Self {
            config,
            scanners: vec![
                Box::new(FanInScanner),
                Box::new(ExternalCallScanner),
                Box::new(OrphanScanner),
                Box::new(SimilarityScanner),
                Box::new(LongChainScanner),
                Box::new(MemoryScanner),
            ],
        }
    }

    /// Creates a detector that runs only the given scanners, in order.
    #[must_use]
    pub fn with_scanners(config: HeuristicsConfig, scanners: Vec<Box<dyn Scanner>>) -> Self {
        Self { config, scanners }
    }

    /// Returns the heuristics in use.
    #[must_use]
    pub fn config(&self) -> &HeuristicsConfig {
        &self.config
    }

    /// Runs all scanners and concatenates their issues.
    ///
    /// # Errors
    ///
    /// Fails fast with [`AnalysisError::CycleDetected`] on a cyclic graph.
    #[instrument(skip_all, fields(nodes = graph.node_count(), edges = graph.edge_count()))]
    pub fn detect(
        &self,
        graph: &WorkflowGraph,
    ) -> flowscope_core::Result<Vec<Issue>, AnalysisError> {
        let mut issues = Vec::new();
        for scanner in &self.scanners {
            let found = scanner.scan(graph, &self.config)?;
            debug!(scanner = scanner.name(), count = found.len(), "scan complete");
            issues.extend(found);
        }
        Ok(issues)
    }
}

impl Default for IssueDetector {
    fn default() -> Self {
        Self::new(HeuristicsConfig::default())
    }
}

impl std::fmt::Debug for IssueDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = self.scanners.iter().map(|s| s.name()).collect();
        f.debug_struct("IssueDetector")
            .field("config", &self.config)
            .field("scanners", &names)
            .finish()
    }
}

/// Runs the standard scanners over a graph.
///
/// # Errors
///
/// Fails with [`AnalysisError::CycleDetected`] on a cyclic graph.
pub fn detect(
    graph: &WorkflowGraph,
    config: &HeuristicsConfig,
) -> flowscope_core::Result<Vec<Issue>, AnalysisError> {
    IssueDetector::new(config.clone()).detect(graph)
}
