// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Flow Runtime Authors

//! The configuration contract: the core depends only on this narrow
//! accessor trait, never on a concrete document format.

use crate::error::HostError;

/// One node's minimal identity, as read straight out of the configuration
/// document, before it becomes a [`frt_core::NodeIdentity`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRecord {
    pub type_tag: String,
    pub cfg_id: String,
    pub display_name: String,
}

/// Everything the Host node needs from a configuration document.
///
/// Implementors own the parsing; the core only ever calls these four
/// accessors plus `node_count` for iteration bounds.
pub trait ConfigSource {
    fn node_count(&self) -> usize;
    fn get_node(&self, index: usize) -> Result<NodeRecord, HostError>;
    fn get_str(&self, cfg_id: &str, key: &str) -> Result<String, HostError>;
    fn get_int(&self, cfg_id: &str, key: &str) -> Result<i64, HostError>;
    fn get_str_from_array(&self, cfg_id: &str, key: &str, index: usize) -> Result<String, HostError>;
}

/// Read a node's entire `wires` array by walking `get_str_from_array` until
/// it reports an out-of-range index — the array accessor is the only
/// primitive the contract defines, so the wire list has no dedicated
/// method of its own.
pub fn collect_wires(config: &dyn ConfigSource, cfg_id: &str) -> Result<Vec<String>, HostError> {
    let mut wires = Vec::new();
    loop {
        match config.get_str_from_array(cfg_id, "wires", wires.len()) {
            Ok(wire) => wires.push(wire),
            Err(HostError::IndexOutOfRange(_)) => break,
            Err(other) => return Err(other),
        }
    }
    Ok(wires)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
