//! Memory-intensive workflow detection.

use super::Scanner;
use crate::config::HeuristicsConfig;
use crate::error::AnalysisError;
use crate::issue::{Issue, IssueCategory, Severity};
use flowscope_workflow::{Node, WorkflowGraph};

/// Flags workflows with many collection-processing steps.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryScanner;

impl Scanner for MemoryScanner {
    fn name(&self) -> &'static str {
        "memory-intensive"
    }

    fn scan(
        &self,
        graph: &WorkflowGraph,
        config: &HeuristicsConfig,
    ) -> Result<Vec<Issue>, AnalysisError> {
        let thresholds = &config.memory;
        let heavy: Vec<&Node> = graph
            .nodes()
            .filter(|node| thresholds.intensive_kinds.contains(&node.kind()))
            .collect();

        if heavy.len() <= thresholds.threshold {
            return Ok(Vec::new());
        }

        Ok(vec![
            Issue::new(
                IssueCategory::MemoryIntensive,
                Severity::Medium,
                "workflow",
                format!("{} steps hold whole collections in memory", heavy.len()),
                "Stream or paginate data between these steps",
            )
            .with_nodes(heavy.iter().map(|node| node.id.clone())),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::fixtures::{action, graph_with};
    use flowscope_workflow::node::{AggregateNodeConfig, FilterNodeConfig};
    use flowscope_workflow::NodeConfig;

    fn filter(id: &str) -> Node {
        Node::with_id(
            id,
            id,
            NodeConfig::Filter(FilterNodeConfig {
                predicate: "amount > 0".to_string(),
            }),
        )
    }

    fn aggregate(id: &str) -> Node {
        Node::with_id(
            id,
            id,
            NodeConfig::Aggregate(AggregateNodeConfig {
                operation: "sum".to_string(),
                group_by: vec![],
            }),
        )
    }

    fn transform(id: &str) -> Node {
        Node::with_id(id, id, NodeConfig::transform("x * 2"))
    }

    #[test]
    fn four_heavy_nodes_is_fine() {
        let graph = graph_with(
            vec![filter("f1"), filter("f2"), aggregate("g"), transform("t"), action("a")],
            &[],
        );
        let issues = MemoryScanner
            .scan(&graph, &HeuristicsConfig::default())
            .unwrap();
        assert!(issues.is_empty());
    }

    #[test]
    fn five_heavy_nodes_is_one_issue() {
        let graph = graph_with(
            vec![
                filter("f1"),
                filter("f2"),
                aggregate("g"),
                transform("t1"),
                transform("t2"),
                action("a"),
            ],
            &[],
        );
        let issues = MemoryScanner
            .scan(&graph, &HeuristicsConfig::default())
            .unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Medium);
        assert_eq!(issues[0].affected_node_ids.len(), 5);
        assert!(!issues[0].affects(&flowscope_core::NodeId::from("a")));
    }
}
