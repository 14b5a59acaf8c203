//! Core types shared by every flowscope crate.
//!
//! Provides the strongly-typed identifiers used throughout the workflow graph
//! model and the analysis engine, plus the workspace-wide `Result` alias.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{EdgeId, IssueId, NodeId};
