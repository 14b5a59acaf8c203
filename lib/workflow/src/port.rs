//! Port system for workflow nodes.
//!
//! Ports are typed connection points on nodes. Each port has a direction
//! (input or output) and a data type. Connections between ports are valid
//! if their data types are compatible.

use crate::node::NodeKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// The data type carried through a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    String,
    Number,
    Boolean,
    Object,
    Array,
    Date,
    /// Accepts or produces anything.
    #[default]
    Any,
}

impl DataType {
    /// Checks if this data type is compatible with another.
    ///
    /// `Any` is compatible with everything; otherwise the types must match.
    #[must_use]
    pub fn is_compatible_with(self, other: Self) -> bool {
        self == Self::Any || other == Self::Any || self == other
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
            Self::Date => "date",
            Self::Any => "any",
        };
        f.write_str(name)
    }
}

/// Whether a port receives or emits data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortDirection {
    Input,
    Output,
}

/// A port on a workflow node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    /// The ID of this port, unique within its node.
    pub id: String,
    /// Whether this port is an input or an output.
    pub direction: PortDirection,
    /// The data type this port accepts or produces.
    #[serde(default)]
    pub data_type: DataType,
    /// Whether this input is required (must have an incoming edge).
    #[serde(default)]
    pub required: bool,
    /// Node kinds allowed to connect into this port. Empty means unrestricted.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub allowed_source_kinds: BTreeSet<NodeKind>,
}

impl Port {
    /// Creates a new required input port.
    #[must_use]
    pub fn required_input(id: impl Into<String>, data_type: DataType) -> Self {
        Self {
            id: id.into(),
            direction: PortDirection::Input,
            data_type,
            required: true,
            allowed_source_kinds: BTreeSet::new(),
        }
    }

    /// Creates a new optional input port.
    #[must_use]
    pub fn optional_input(id: impl Into<String>, data_type: DataType) -> Self {
        Self {
            required: false,
            ..Self::required_input(id, data_type)
        }
    }

    /// Creates a new output port.
    #[must_use]
    pub fn output(id: impl Into<String>, data_type: DataType) -> Self {
        Self {
            id: id.into(),
            direction: PortDirection::Output,
            data_type,
            required: false,
            allowed_source_kinds: BTreeSet::new(),
        }
    }

    /// Restricts which node kinds may connect into this port.
    #[must_use]
    pub fn accepting_only(mut self, kinds: impl IntoIterator<Item = NodeKind>) -> Self {
        self.allowed_source_kinds = kinds.into_iter().collect();
        self
    }

    /// Returns true if this is an input port.
    #[must_use]
    pub fn is_input(&self) -> bool {
        self.direction == PortDirection::Input
    }

    /// Returns true if a node of `kind` may connect into this port.
    #[must_use]
    pub fn accepts_source(&self, kind: NodeKind) -> bool {
        self.allowed_source_kinds.is_empty() || self.allowed_source_kinds.contains(&kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_compatible_with_all() {
        assert!(DataType::Any.is_compatible_with(DataType::String));
        assert!(DataType::Number.is_compatible_with(DataType::Any));
        assert!(DataType::Any.is_compatible_with(DataType::Any));
    }

    #[test]
    fn same_type_compatible() {
        assert!(DataType::Date.is_compatible_with(DataType::Date));
    }

    #[test]
    fn different_types_not_compatible() {
        assert!(!DataType::String.is_compatible_with(DataType::Number));
        assert!(!DataType::Object.is_compatible_with(DataType::Array));
    }

    #[test]
    fn required_input_port() {
        let port = Port::required_input("data", DataType::String);
        assert!(port.required);
        assert!(port.is_input());
        assert_eq!(port.id, "data");
    }

    #[test]
    fn optional_input_port() {
        let port = Port::optional_input("config", DataType::Object);
        assert!(!port.required);
        assert!(port.is_input());
    }

    #[test]
    fn unrestricted_port_accepts_any_source() {
        let port = Port::required_input("in", DataType::Any);
        assert!(port.accepts_source(NodeKind::Trigger));
        assert!(port.accepts_source(NodeKind::Agent));
    }

    #[test]
    fn restricted_port_checks_membership() {
        let port = Port::required_input("in", DataType::Any)
            .accepting_only([NodeKind::Condition, NodeKind::Filter]);
        assert!(port.accepts_source(NodeKind::Filter));
        assert!(!port.accepts_source(NodeKind::Integration));
    }

    #[test]
    fn missing_fields_use_defaults() {
        let port: Port =
            serde_json::from_str(r#"{"id":"in","direction":"input"}"#).expect("deserialize");
        assert_eq!(port.data_type, DataType::Any);
        assert!(!port.required);
        assert!(port.allowed_source_kinds.is_empty());
    }
}
