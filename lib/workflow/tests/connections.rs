use flowscope_core::NodeId;
use flowscope_workflow::node::{
    AgentNodeConfig, AggregateNodeConfig, ConditionNodeConfig, DataNodeConfig, FilterNodeConfig,
    OutputNodeConfig,
};
use flowscope_workflow::{
    ConnectionRejection, DataType, DocumentError, Edge, Node, NodeConfig, NodeKind, Port,
    WorkflowDocument, WorkflowGraph, validate_connection,
};

fn node_of(kind: NodeKind, id: &str) -> Node {
    let config = match kind {
        NodeKind::Trigger => NodeConfig::manual_trigger(),
        NodeKind::Action => NodeConfig::action("run"),
        NodeKind::Condition => NodeConfig::Condition(ConditionNodeConfig {
            expression: "total > 100".to_string(),
        }),
        NodeKind::Transform => NodeConfig::transform("upper(name)"),
        NodeKind::Data => NodeConfig::Data(DataNodeConfig {
            source: "orders".to_string(),
        }),
        NodeKind::Aggregate => NodeConfig::Aggregate(AggregateNodeConfig {
            operation: "count".to_string(),
            group_by: vec![],
        }),
        NodeKind::Filter => NodeConfig::Filter(FilterNodeConfig {
            predicate: "active".to_string(),
        }),
        NodeKind::Integration => NodeConfig::integration("http", "get"),
        NodeKind::Agent => NodeConfig::Agent(AgentNodeConfig {
            goal: "triage".to_string(),
            max_iterations: 3,
            available_tools: vec![],
        }),
        NodeKind::Output => NodeConfig::Output(OutputNodeConfig::Log {
            level: Default::default(),
        }),
    };
    Node::with_id(id, id, config)
}

#[test]
fn triggers_never_accept_inbound_edges() {
    for kind in NodeKind::ALL {
        let mut graph = WorkflowGraph::new();
        graph.add_node(node_of(kind, "source")).unwrap();
        graph.add_node(node_of(NodeKind::Trigger, "start")).unwrap();

        for edge in [
            Edge::new("source", "start"),
            Edge::new("source", "start").via("output", "input"),
        ] {
            let verdict = validate_connection(&graph, &edge);
            assert!(verdict.is_err(), "{kind} -> trigger was accepted");
        }
        assert_eq!(
            validate_connection(&graph, &Edge::new("source", "start")),
            Err(ConnectionRejection::TriggerTarget {
                node_id: NodeId::from("start")
            })
        );
    }
}

#[test]
fn validation_is_repeatable() {
    let mut graph = WorkflowGraph::new();
    graph
        .add_node(
            Node::with_id("report", "Report", NodeConfig::action("render"))
                .with_ports(vec![Port::required_input("rows", DataType::Array)]),
        )
        .unwrap();
    graph
        .add_node(
            Node::with_id("count", "Count", NodeConfig::action("count"))
                .with_ports(vec![Port::output("total", DataType::Number)]),
        )
        .unwrap();

    let edge = Edge::new("count", "report").via("total", "rows");
    let first = validate_connection(&graph, &edge);
    let second = validate_connection(&graph, &edge);
    assert_eq!(first, second);
    assert_eq!(first.unwrap_err().to_string(), "incompatible data types");
}

#[test]
fn document_applies_accepted_edits_only() {
    let mut document = WorkflowDocument::default();
    document.add_node(node_of(NodeKind::Trigger, "start")).unwrap();
    document.add_node(node_of(NodeKind::Action, "work")).unwrap();

    document.connect(Edge::new("start", "work")).unwrap();
    let rejected = document.connect(Edge::new("work", "start"));
    assert!(matches!(
        rejected,
        Err(DocumentError::Rejected(ConnectionRejection::TriggerTarget { .. }))
    ));
    assert_eq!(document.graph().edge_count(), 1);

    let optimized = document
        .graph()
        .with_optimized([&NodeId::from("work")]);
    document.replace(optimized);
    assert!(
        document
            .graph()
            .get_node(&NodeId::from("work"))
            .unwrap()
            .optimized
    );
}

#[test]
fn snapshot_json_drops_dangling_edges() {
    let json = r#"{
        "nodes": [
            {"id": "a", "label": "A", "config": {"kind": "action", "action": "fetch"}},
            {"id": "b", "label": "B", "config": {"kind": "transform", "expression": "x"}}
        ],
        "edges": [
            {"id": "e1", "source": "a", "target": "b"},
            {"id": "e2", "source": "a", "target": "ghost"}
        ]
    }"#;
    let graph: WorkflowGraph = serde_json::from_str(json).unwrap();
    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edge_count(), 1);
    assert_eq!(graph.get_node(&NodeId::from("b")).unwrap().kind(), NodeKind::Transform);

    let back = serde_json::to_value(&graph).unwrap();
    assert_eq!(back["edges"].as_array().unwrap().len(), 1);
}

#[test]
fn portless_snapshot_nodes_keep_pinned_edges() {
    let json = r#"{
        "nodes": [
            {"id": "t", "label": "Start", "config": {"kind": "trigger", "type": "manual"}},
            {"id": "a", "label": "Send", "config": {"kind": "action", "action": "send"}}
        ],
        "edges": [
            {"id": "e1", "source": "t", "target": "a", "source_handle": "output", "target_handle": "input"}
        ]
    }"#;
    let graph: WorkflowGraph = serde_json::from_str(json).unwrap();
    assert_eq!(graph.edge_count(), 1);
    let action = graph.get_node(&NodeId::from("a")).unwrap();
    assert!(action.input_port("input").unwrap().required);
    assert!(graph.validate().is_ok());
}
