// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Flow Runtime Authors

//! Node identity, lifecycle state, and the capability table.

use crate::error::CoreError;
use crate::event::EventMask;
use crate::ids::NodeId;
use crate::message::Message;

/// Upper bound on a node's declared fan-out. Exceeding it is a
/// configuration error, not a silent truncation.
pub const MAX_WIRES: usize = 4;

/// Lifecycle state of a node.
///
/// Reverse transitions (`Started` → `Initialised`) are permitted via
/// `stop`; `Error` is terminal and does not block other nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    Created,
    Initialised,
    Started,
    Deinitialised,
    Error,
}

crate::simple_display! {
    NodeState {
        Created => "created",
        Initialised => "initialised",
        Started => "started",
        Deinitialised => "deinitialised",
        Error => "error",
    }
}

impl NodeState {
    pub const fn is_terminal_error(self) -> bool {
        matches!(self, NodeState::Error)
    }
}

/// Static identity of a node, read out of configuration at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeIdentity {
    pub cfg_id: NodeId,
    pub display_name: String,
    pub type_tag: String,
    pub wires: Vec<NodeId>,
}

impl NodeIdentity {
    pub fn new(
        cfg_id: impl Into<NodeId>,
        display_name: impl Into<String>,
        type_tag: impl Into<String>,
        wires: Vec<NodeId>,
    ) -> Result<Self, CoreError> {
        if wires.len() > MAX_WIRES {
            return Err(CoreError::TooManyWires {
                node: cfg_id.into().to_string(),
                count: wires.len(),
                limit: MAX_WIRES,
            });
        }
        Ok(Self { cfg_id: cfg_id.into(), display_name: display_name.into(), type_tag: type_tag.into(), wires })
    }
}

/// Context handed to every capability-table entry point: everything a node
/// needs to know about itself, without holding an owning reference to the
/// dispatcher or to any other node. Downstream nodes are named by id only.
pub struct NodeContext<'a> {
    pub identity: &'a NodeIdentity,
}

/// The capability table every node type implements. Each entry point
/// defaults to "not supported" so a node only overrides what it uses.
pub trait Node: Send {
    fn init(&mut self, _ctx: &NodeContext<'_>) -> crate::status::StatusCode {
        crate::status::StatusCode::NotSupported
    }

    fn deinit(&mut self, _ctx: &NodeContext<'_>) -> crate::status::StatusCode {
        crate::status::StatusCode::NotSupported
    }

    fn start(&mut self, _ctx: &NodeContext<'_>) -> crate::status::StatusCode {
        crate::status::StatusCode::NotSupported
    }

    fn stop(&mut self, _ctx: &NodeContext<'_>) -> crate::status::StatusCode {
        crate::status::StatusCode::NotSupported
    }

    /// Receive a message. The callee owns `msg` on entry — the dispatcher
    /// never frees it after the call returns. A node that forwards the
    /// message onward must not call `free` itself.
    fn recv_msg(&mut self, _ctx: &NodeContext<'_>, _msg: Message) -> crate::status::StatusCode {
        crate::status::StatusCode::NotSupported
    }

    fn recv_evt(&mut self, _ctx: &NodeContext<'_>, _mask: EventMask) -> crate::status::StatusCode {
        crate::status::StatusCode::NotSupported
    }
}

#[cfg(test)]
#[path = "node_tests.rs"]
mod tests;
