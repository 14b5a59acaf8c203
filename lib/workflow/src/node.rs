//! Workflow node types and configurations.
//!
//! Nodes are the building blocks of workflows. Each node has:
//! - A unique ID within the workflow
//! - A display label
//! - Configuration specific to its kind (the kind is derived from it)
//! - Input and output ports

use crate::port::{DataType, Port, PortDirection};
use flowscope_core::NodeId;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

/// The kind of a workflow node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Entry points that initiate workflow execution.
    Trigger,
    /// Generic side-effecting steps.
    Action,
    /// Boolean branching.
    Condition,
    /// Expression-based data manipulation.
    Transform,
    /// Static or fetched data sources.
    Data,
    /// Grouping and reduction over collections.
    Aggregate,
    /// Predicate-based selection over collections.
    Filter,
    /// Calls to external services.
    Integration,
    /// LLM-driven execution loops.
    Agent,
    /// Terminal actions (notify, log, HTTP response).
    Output,
}

impl NodeKind {
    /// All node kinds, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::Trigger,
        Self::Action,
        Self::Condition,
        Self::Transform,
        Self::Data,
        Self::Aggregate,
        Self::Filter,
        Self::Integration,
        Self::Agent,
        Self::Output,
    ];

    /// Returns the snake_case name of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trigger => "trigger",
            Self::Action => "action",
            Self::Condition => "condition",
            Self::Transform => "transform",
            Self::Data => "data",
            Self::Aggregate => "aggregate",
            Self::Filter => "filter",
            Self::Integration => "integration",
            Self::Agent => "agent",
            Self::Output => "output",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for trigger nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TriggerNodeConfig {
    /// Cron-style scheduled trigger.
    Schedule {
        /// Cron expression (e.g., "0 7 * * *" for 7am daily).
        cron: String,
        /// Timezone for the schedule.
        #[serde(default)]
        timezone: Option<String>,
    },
    /// HTTP webhook trigger.
    Webhook {
        /// The webhook path (e.g., "/hooks/my-workflow").
        path: String,
    },
    /// Messaging-platform or integration event trigger.
    IntegrationEvent {
        /// The integration account ID.
        integration_id: String,
        /// The event type to listen for.
        event_type: String,
    },
    /// Manual trigger (user-initiated).
    Manual,
}

/// Configuration for generic action nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionNodeConfig {
    /// The action to perform (e.g., "send_email").
    pub action: String,
    /// Action-specific parameters.
    #[serde(default)]
    pub parameters: JsonValue,
}

/// Configuration for condition nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionNodeConfig {
    /// The boolean expression deciding which branch runs.
    pub expression: String,
}

/// Configuration for transform nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformNodeConfig {
    /// Expression for data transformation.
    pub expression: String,
}

/// Configuration for data source nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataNodeConfig {
    /// Where the data comes from (table name, URL, inline, ...).
    pub source: String,
}

/// Configuration for aggregate nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateNodeConfig {
    /// The reduction to apply (e.g., "sum", "count").
    pub operation: String,
    /// Fields to group by before reducing.
    #[serde(default)]
    pub group_by: Vec<String>,
}

/// Configuration for filter nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterNodeConfig {
    /// Predicate each item must satisfy.
    pub predicate: String,
}

/// Configuration for integration nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationNodeConfig {
    /// The integration type (e.g., "email", "calendar").
    pub integration_type: String,
    /// The operation to perform (e.g., "fetch", "send", "list").
    pub operation: String,
    /// Operation-specific parameters.
    #[serde(default)]
    pub parameters: JsonValue,
}

/// Configuration for agent nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentNodeConfig {
    /// The goal to achieve.
    pub goal: String,
    /// Maximum iterations before failing.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
    /// Tools available to the agent.
    #[serde(default)]
    pub available_tools: Vec<String>,
}

fn default_max_iterations() -> u32 {
    10
}

/// Configuration for output nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputNodeConfig {
    /// Send a notification.
    Notify {
        /// Notification channel (e.g., "email", "push").
        channel: String,
        /// Template for the notification.
        template: String,
    },
    /// Log to execution history.
    Log {
        /// Log level.
        #[serde(default)]
        level: LogLevel,
    },
    /// HTTP response (for webhook-triggered workflows).
    HttpResponse {
        /// Status code to return.
        status_code: u16,
    },
}

/// Log level for log nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

/// Configuration for a node, varying by kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeConfig {
    Trigger(TriggerNodeConfig),
    Action(ActionNodeConfig),
    Condition(ConditionNodeConfig),
    Transform(TransformNodeConfig),
    Data(DataNodeConfig),
    Aggregate(AggregateNodeConfig),
    Filter(FilterNodeConfig),
    Integration(IntegrationNodeConfig),
    Agent(AgentNodeConfig),
    Output(OutputNodeConfig),
}

impl NodeConfig {
    /// Returns the kind of this node configuration.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Trigger(_) => NodeKind::Trigger,
            Self::Action(_) => NodeKind::Action,
            Self::Condition(_) => NodeKind::Condition,
            Self::Transform(_) => NodeKind::Transform,
            Self::Data(_) => NodeKind::Data,
            Self::Aggregate(_) => NodeKind::Aggregate,
            Self::Filter(_) => NodeKind::Filter,
            Self::Integration(_) => NodeKind::Integration,
            Self::Agent(_) => NodeKind::Agent,
            Self::Output(_) => NodeKind::Output,
        }
    }

    /// A manual trigger.
    #[must_use]
    pub fn manual_trigger() -> Self {
        Self::Trigger(TriggerNodeConfig::Manual)
    }

    /// A generic action with no parameters.
    #[must_use]
    pub fn action(action: impl Into<String>) -> Self {
        Self::Action(ActionNodeConfig {
            action: action.into(),
            parameters: JsonValue::Null,
        })
    }

    /// An integration call with no parameters.
    #[must_use]
    pub fn integration(integration_type: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::Integration(IntegrationNodeConfig {
            integration_type: integration_type.into(),
            operation: operation.into(),
            parameters: JsonValue::Null,
        })
    }

    /// A transform with the given expression.
    #[must_use]
    pub fn transform(expression: impl Into<String>) -> Self {
        Self::Transform(TransformNodeConfig {
            expression: expression.into(),
        })
    }
}

/// A workflow node.
///
/// A serialized node may omit `ports`; it then gets the default ports for
/// its kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "NodeRecord")]
pub struct Node {
    /// Unique identifier for this node within the workflow.
    pub id: NodeId,
    /// Human-readable label shown on the canvas.
    pub label: String,
    /// Node configuration (determines kind and behavior).
    pub config: NodeConfig,
    /// Input and output ports for this node.
    pub ports: Vec<Port>,
    /// Set by the optimizer on nodes it touched.
    pub optimized: bool,
}

/// Wire form of [`Node`] with optional fields.
#[derive(Deserialize)]
struct NodeRecord {
    id: NodeId,
    label: String,
    config: NodeConfig,
    #[serde(default)]
    ports: Option<Vec<Port>>,
    #[serde(default)]
    optimized: bool,
}

impl From<NodeRecord> for Node {
    fn from(record: NodeRecord) -> Self {
        let ports = record
            .ports
            .unwrap_or_else(|| Node::default_ports(&record.config));
        Self {
            id: record.id,
            label: record.label,
            config: record.config,
            ports,
            optimized: record.optimized,
        }
    }
}

impl Node {
    /// Creates a new node with a generated ID and default ports for its kind.
    #[must_use]
    pub fn new(label: impl Into<String>, config: NodeConfig) -> Self {
        Self::with_id(NodeId::new(), label, config)
    }

    /// Creates a new node with a specific ID and default ports for its kind.
    #[must_use]
    pub fn with_id(id: impl Into<NodeId>, label: impl Into<String>, config: NodeConfig) -> Self {
        let ports = Self::default_ports(&config);
        Self {
            id: id.into(),
            label: label.into(),
            config,
            ports,
            optimized: false,
        }
    }

    /// Replaces the node's ports.
    #[must_use]
    pub fn with_ports(mut self, ports: Vec<Port>) -> Self {
        self.ports = ports;
        self
    }

    /// Returns the kind of this node.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.config.kind()
    }

    /// Returns the port with the given ID and direction, if any.
    #[must_use]
    pub fn port(&self, id: &str, direction: PortDirection) -> Option<&Port> {
        self.ports
            .iter()
            .find(|p| p.id == id && p.direction == direction)
    }

    /// Returns the input port with the given ID, if any.
    #[must_use]
    pub fn input_port(&self, id: &str) -> Option<&Port> {
        self.port(id, PortDirection::Input)
    }

    /// Returns the output port with the given ID, if any.
    #[must_use]
    pub fn output_port(&self, id: &str) -> Option<&Port> {
        self.port(id, PortDirection::Output)
    }

    /// Returns all input ports.
    pub fn inputs(&self) -> impl Iterator<Item = &Port> {
        self.ports.iter().filter(|p| p.direction == PortDirection::Input)
    }

    /// Returns all output ports.
    pub fn outputs(&self) -> impl Iterator<Item = &Port> {
        self.ports.iter().filter(|p| p.direction == PortDirection::Output)
    }

    /// Generates default ports based on node configuration.
    fn default_ports(config: &NodeConfig) -> Vec<Port> {
        match config {
            // Triggers have no inputs, one output
            NodeConfig::Trigger(_) => vec![Port::output("output", DataType::Any)],
            NodeConfig::Action(_) | NodeConfig::Transform(_) => vec![
                Port::required_input("input", DataType::Any),
                Port::output("output", DataType::Any),
            ],
            NodeConfig::Condition(_) => vec![
                Port::required_input("input", DataType::Any),
                Port::output("true", DataType::Any),
                Port::output("false", DataType::Any),
            ],
            NodeConfig::Data(_) => vec![
                Port::optional_input("input", DataType::Any),
                Port::output("records", DataType::Array),
            ],
            NodeConfig::Aggregate(_) => vec![
                Port::required_input("items", DataType::Array),
                Port::output("result", DataType::Object),
            ],
            NodeConfig::Filter(_) => vec![
                Port::required_input("items", DataType::Array),
                Port::output("matched", DataType::Array),
            ],
            NodeConfig::Integration(_) => vec![
                Port::optional_input("input", DataType::Any),
                Port::output("output", DataType::Any),
            ],
            NodeConfig::Agent(_) => vec![
                Port::required_input("context", DataType::Any),
                Port::output("result", DataType::Any),
            ],
            NodeConfig::Output(_) => vec![Port::required_input("input", DataType::Any)],
        }
    }
}
