// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Flow Runtime Authors

//! The live node table: every registered node's identity, lifecycle state,
//! and boxed capability-table instance, keyed by configuration id.

use frt_core::{CoreError, Node, NodeIdentity, NodeState};
use std::collections::HashMap;

struct Entry {
    identity: NodeIdentity,
    state: NodeState,
    /// `None` while the instance is checked out to run a callback.
    node: Option<Box<dyn Node>>,
}

/// Registry of every node known to a running flow.
///
/// Registration order is preserved (`register` appends to `order`) so a
/// caller that needs to walk every node deterministically — the worker
/// thread's shutdown pass, for instance — sees configuration order rather
/// than hash order.
#[derive(Default)]
pub struct NodeTable {
    entries: HashMap<frt_core::NodeId, Entry>,
    order: Vec<frt_core::NodeId>,
}

impl NodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a newly constructed node. Rejects a duplicate configuration
    /// id rather than silently overwriting it — an id must resolve to at
    /// most one live node.
    pub fn register(&mut self, identity: NodeIdentity, node: Box<dyn Node>) -> Result<(), CoreError> {
        if self.entries.contains_key(&identity.cfg_id) {
            return Err(CoreError::DuplicateNodeId(identity.cfg_id.to_string()));
        }
        let id = identity.cfg_id.clone();
        self.entries.insert(id.clone(), Entry { identity, state: NodeState::Created, node: Some(node) });
        self.order.push(id);
        Ok(())
    }

    pub fn state(&self, id: &str) -> Result<NodeState, CoreError> {
        self.entries.get(id).map(|e| e.state).ok_or_else(|| CoreError::NodeNotFound(id.to_string()))
    }

    pub fn set_state(&mut self, id: &str, state: NodeState) -> Result<(), CoreError> {
        let entry = self.entries.get_mut(id).ok_or_else(|| CoreError::NodeNotFound(id.to_string()))?;
        entry.state = state;
        Ok(())
    }

    pub fn identity(&self, id: &str) -> Result<&NodeIdentity, CoreError> {
        self.entries.get(id).map(|e| &e.identity).ok_or_else(|| CoreError::NodeNotFound(id.to_string()))
    }

    pub fn node_mut(&mut self, id: &str) -> Result<&mut (dyn Node + 'static), CoreError> {
        let entry = self.entries.get_mut(id).ok_or_else(|| CoreError::NodeNotFound(id.to_string()))?;
        entry
            .node
            .as_deref_mut()
            .ok_or_else(|| CoreError::InvalidState(format!("node {id} is currently running a callback")))
    }

    /// Take a node's instance out of the registry so a callback can run on
    /// it without the table staying borrowed; its identity and state stay
    /// behind, so lookups and sends against the id keep resolving.
    pub fn checkout(&mut self, id: &str) -> Result<(NodeIdentity, Box<dyn Node>), CoreError> {
        let entry = self.entries.get_mut(id).ok_or_else(|| CoreError::NodeNotFound(id.to_string()))?;
        let node = entry
            .node
            .take()
            .ok_or_else(|| CoreError::InvalidState(format!("node {id} is already checked out")))?;
        Ok((entry.identity.clone(), node))
    }

    /// Return a checked-out instance. If the node was removed while its
    /// callback ran (a flow reload from inside the flow), it is dropped here.
    pub fn checkin(&mut self, id: &str, node: Box<dyn Node>) {
        if let Some(entry) = self.entries.get_mut(id) {
            entry.node = Some(node);
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Drop a node entirely, e.g. during a flow reload. Removing an id that
    /// is not present is a no-op, matching `stop_listen`-style idempotence
    /// for a bulk teardown pass that does not track what it already saw.
    pub fn remove(&mut self, id: &str) {
        if self.entries.remove(id).is_some() {
            self.order.retain(|existing| existing.as_str() != id);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ids in the order they were registered.
    pub fn ids_in_registration_order(&self) -> impl Iterator<Item = &frt_core::NodeId> {
        self.order.iter()
    }

    /// Debug/test accessor: a snapshot of every node's current state.
    pub fn snapshot(&self) -> Vec<(frt_core::NodeId, NodeState)> {
        self.order.iter().map(|id| (id.clone(), self.entries[id].state)).collect()
    }
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
