//! Workflow graph model for flowscope.
//!
//! This crate provides the in-memory representation the analysis engine
//! works on, including:
//!
//! - **Graph Model**: Directed graphs using petgraph with typed nodes and edges
//! - **Node Kinds**: Trigger, Action, Condition, Transform, Data, Aggregate,
//!   Filter, Integration, Agent, Output
//! - **Port System**: Typed input/output ports with optional source-kind
//!   restrictions
//! - **Connection Validation**: The rules deciding whether a proposed edge
//!   may be added
//! - **Document**: The single owner through which a live graph is edited

pub mod document;
pub mod edge;
pub mod error;
pub mod graph;
pub mod node;
pub mod port;
pub mod validate;

pub use document::{DocumentError, WorkflowDocument};
pub use edge::Edge;
pub use error::{ConnectionRejection, GraphError};
pub use graph::{GraphSnapshot, WorkflowGraph};
pub use node::{Node, NodeConfig, NodeKind};
pub use port::{DataType, Port, PortDirection};
pub use validate::validate_connection;
