//! Connection validation for user-proposed edges.
//!
//! The editor calls [`validate_connection`] on every drag-to-connect gesture,
//! before the edge is committed. Rules are checked in order and the first
//! failure wins:
//!
//! 1. Both endpoints exist.
//! 2. The target is not a trigger.
//! 3. If both ports are pinned, their data types are compatible.
//! 4. If the target port restricts source kinds, the source kind is allowed.
//!
//! A handle that is pinned but does not resolve to a port of the right
//! direction counts as incompatible. An unpinned handle skips the port rules
//! that need it.

use crate::edge::Edge;
use crate::error::ConnectionRejection;
use crate::graph::WorkflowGraph;
use crate::node::{Node, NodeKind};
use crate::port::Port;
use tracing::debug;

/// Outcome of resolving one end of a proposed edge to a port.
enum PortResolution<'a> {
    Unpinned,
    Resolved(&'a Port),
    Dangling(&'a str),
}

impl<'a> PortResolution<'a> {
    fn source(node: &'a Node, handle: Option<&'a str>) -> Self {
        match handle {
            None => Self::Unpinned,
            Some(id) => node.output_port(id).map_or(Self::Dangling(id), Self::Resolved),
        }
    }

    fn target(node: &'a Node, handle: Option<&'a str>) -> Self {
        match handle {
            None => Self::Unpinned,
            Some(id) => node.input_port(id).map_or(Self::Dangling(id), Self::Resolved),
        }
    }

    fn label(&self) -> String {
        match self {
            Self::Unpinned => String::new(),
            Self::Resolved(port) => port.id.clone(),
            Self::Dangling(id) => (*id).to_string(),
        }
    }
}

/// Decides whether `proposed` may be added to `graph`.
///
/// Pure: the graph is not modified and repeated calls return the same answer.
/// Inserting an accepted edge is the caller's job.
///
/// # Errors
///
/// Returns the first [`ConnectionRejection`] that applies.
pub fn validate_connection(
    graph: &WorkflowGraph,
    proposed: &Edge,
) -> Result<(), ConnectionRejection> {
    let result = check_rules(graph, proposed);
    if let Err(rejection) = &result {
        debug!(
            edge_id = %proposed.id,
            source = %proposed.source,
            target = %proposed.target,
            %rejection,
            "connection rejected"
        );
    }
    result
}

fn check_rules(graph: &WorkflowGraph, proposed: &Edge) -> Result<(), ConnectionRejection> {
    let source = graph
        .get_node(&proposed.source)
        .ok_or_else(|| ConnectionRejection::UnknownEndpoint {
            node_id: proposed.source.clone(),
        })?;
    let target = graph
        .get_node(&proposed.target)
        .ok_or_else(|| ConnectionRejection::UnknownEndpoint {
            node_id: proposed.target.clone(),
        })?;

    if target.kind() == NodeKind::Trigger {
        return Err(ConnectionRejection::TriggerTarget {
            node_id: target.id.clone(),
        });
    }

    let source_port = PortResolution::source(source, proposed.source_handle.as_deref());
    let target_port = PortResolution::target(target, proposed.target_handle.as_deref());
    let incompatible = || ConnectionRejection::IncompatibleDataTypes {
        source_port: source_port.label(),
        target_port: target_port.label(),
    };

    match (&source_port, &target_port) {
        (PortResolution::Dangling(_), _) | (_, PortResolution::Dangling(_)) => {
            return Err(incompatible());
        }
        (PortResolution::Resolved(out), PortResolution::Resolved(input))
            if !out.data_type.is_compatible_with(input.data_type) =>
        {
            return Err(incompatible());
        }
        _ => {}
    }

    if let PortResolution::Resolved(input) = target_port {
        if !input.accepts_source(source.kind()) {
            return Err(ConnectionRejection::SourceKindNotPermitted {
                source_kind: source.kind().to_string(),
                target_port: input.id.clone(),
            });
        }
    }

    Ok(())
}
