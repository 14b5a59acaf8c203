//! Redundant step detection by label similarity.

use super::Scanner;
use crate::config::HeuristicsConfig;
use crate::error::AnalysisError;
use crate::issue::{Issue, IssueCategory, Severity};
use flowscope_workflow::{Node, NodeKind, WorkflowGraph};
use std::collections::BTreeMap;

/// Flags pairs of same-kind nodes whose labels look alike.
///
/// Labels are compared case-insensitively. Two labels are similar when one
/// contains the other or their edit distance is below the configured limit.
/// Each similar pair yields its own issue.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimilarityScanner;

impl Scanner for SimilarityScanner {
    fn name(&self) -> &'static str {
        "similar-nodes"
    }

    fn scan(
        &self,
        graph: &WorkflowGraph,
        config: &HeuristicsConfig,
    ) -> Result<Vec<Issue>, AnalysisError> {
        let mut by_kind: BTreeMap<NodeKind, Vec<(&Node, String)>> = BTreeMap::new();
        for node in graph.nodes() {
            by_kind
                .entry(node.kind())
                .or_default()
                .push((node, node.label.to_lowercase()));
        }

        let max_distance = config.similarity.max_edit_distance;
        let mut issues = Vec::new();

        for group in by_kind.values().filter(|group| group.len() >= 2) {
            for (i, (first, first_label)) in group.iter().enumerate() {
                for (second, second_label) in &group[i + 1..] {
                    if !labels_similar(first_label, second_label, max_distance) {
                        continue;
                    }
                    issues.push(
                        Issue::new(
                            IssueCategory::SimilarNodes,
                            Severity::Medium,
                            format_args!(
                                "{}+{}",
                                escape_subject(first.id.as_str()),
                                escape_subject(second.id.as_str())
                            ),
                            format!(
                                "'{}' and '{}' look like the same {} step",
                                first.label,
                                second.label,
                                first.kind()
                            ),
                            "Merge these steps or reuse one result in both places",
                        )
                        .with_nodes([first.id.clone(), second.id.clone()]),
                    );
                }
            }
        }

        Ok(issues)
    }
}

/// Escapes `\` and `+` so a joined pair of IDs splits back one way only.
fn escape_subject(id: &str) -> String {
    id.replace('\\', "\\\\").replace('+', "\\+")
}

/// Returns true if two (already normalized) labels count as similar.
#[must_use]
pub fn labels_similar(a: &str, b: &str, max_distance: usize) -> bool {
    a.contains(b) || b.contains(a) || levenshtein(a, b) < max_distance
}

/// Classic edit distance: insertions, deletions and substitutions each cost 1.
///
/// Works on Unicode scalar values, not bytes.
#[must_use]
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            let deletion = previous[j + 1] + 1;
            let insertion = current[j] + 1;
            current[j + 1] = substitution.min(deletion).min(insertion);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::fixtures::graph_with;
    use flowscope_core::NodeId;
    use flowscope_workflow::NodeConfig;
    use std::collections::BTreeSet;

    fn scan(graph: &WorkflowGraph) -> Vec<Issue> {
        SimilarityScanner
            .scan(graph, &HeuristicsConfig::default())
            .unwrap()
    }

    #[test]
    fn levenshtein_known_values() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("workflow", "workflow"), 0);
        assert_eq!(levenshtein("flaw", "lawn"), 2);
    }

    #[test]
    fn levenshtein_counts_characters_not_bytes() {
        assert_eq!(levenshtein("café", "cafe"), 1);
    }

    #[test]
    fn substring_labels_are_similar() {
        assert!(labels_similar("send email", "send email to customer", 5));
        assert!(!labels_similar("fetch invoices", "archive customers", 5));
    }

    #[test]
    fn distance_limit_is_strict() {
        // distance 5 is not below 5
        assert_eq!(levenshtein("abcde", "vwxyz"), 5);
        assert!(!labels_similar("abcde", "vwxyz", 5));
        assert!(labels_similar("abcde", "abxyz", 5));
    }

    #[test]
    fn compares_only_within_a_kind() {
        let graph = graph_with(
            vec![
                Node::with_id("a", "Send Email", NodeConfig::action("send")),
                Node::with_id("b", "send email", NodeConfig::action("send")),
                Node::with_id("c", "Send Email", NodeConfig::integration("smtp", "send")),
            ],
            &[],
        );
        let issues = scan(&graph);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].id.as_str(), "similar-nodes:a+b");
        assert_eq!(issues[0].severity, Severity::Medium);
        assert!(issues[0].affects(&NodeId::from("a")));
        assert!(issues[0].affects(&NodeId::from("b")));
    }

    #[test]
    fn one_issue_per_similar_pair() {
        let graph = graph_with(
            vec![
                Node::with_id("a", "Notify team", NodeConfig::action("notify")),
                Node::with_id("b", "Notify teams", NodeConfig::action("notify")),
                Node::with_id("c", "Notify team lead", NodeConfig::action("notify")),
                Node::with_id("d", "Generate quarterly report", NodeConfig::action("report")),
            ],
            &[],
        );
        let ids: Vec<_> = scan(&graph).into_iter().map(|i| i.id.to_string()).collect();
        // "notify teams" vs "notify team lead" is distance 5 and neither contains the other
        assert_eq!(ids, vec!["similar-nodes:a+b", "similar-nodes:a+c"]);
    }

    #[test]
    fn pair_ids_stay_unique_when_ids_contain_plus() {
        let graph = graph_with(
            ["a", "b+c", "a+b", "c"]
                .into_iter()
                .map(|id| Node::with_id(id, "Sync ledger", NodeConfig::action("sync")))
                .collect(),
            &[],
        );
        let ids: BTreeSet<String> = scan(&graph).into_iter().map(|i| i.id.to_string()).collect();
        assert_eq!(ids.len(), 6);
        assert!(ids.contains(r"similar-nodes:a+b\+c"));
        assert!(ids.contains(r"similar-nodes:a\+b+c"));
    }
}
