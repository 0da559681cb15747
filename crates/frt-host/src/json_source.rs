// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Flow Runtime Authors

//! Minimal `serde_json`-backed [`ConfigSource`]: just enough parsing to
//! turn a JSON array document into the four accessor calls the core needs.
//! Not a general-purpose configuration layer — a malformed document is
//! reported through [`HostError`], nothing is guessed or defaulted.

use crate::config::{ConfigSource, NodeRecord};
use crate::error::HostError;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug)]
pub struct JsonConfigSource {
    nodes: Vec<Value>,
    index_by_id: HashMap<String, usize>,
}

impl JsonConfigSource {
    /// Read and parse a flow document from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, HostError> {
        let path = path.as_ref();
        let document = std::fs::read_to_string(path)
            .map_err(|source| HostError::Io { path: path.display().to_string(), source })?;
        Self::parse(&document)
    }

    pub fn parse(document: &str) -> Result<Self, HostError> {
        let value: Value = serde_json::from_str(document).map_err(|e| HostError::Malformed(e.to_string()))?;
        let Value::Array(nodes) = value else {
            return Err(HostError::Malformed("configuration document must be a JSON array".into()));
        };

        let mut index_by_id = HashMap::new();
        for (i, node) in nodes.iter().enumerate() {
            let id = node
                .get("id")
                .and_then(Value::as_str)
                .ok_or_else(|| HostError::MissingField { node: i.to_string(), key: "id".into() })?;
            index_by_id.insert(id.to_string(), i);
        }
        Ok(Self { nodes, index_by_id })
    }

    fn node_value(&self, cfg_id: &str) -> Result<&Value, HostError> {
        let index = self
            .index_by_id
            .get(cfg_id)
            .ok_or_else(|| HostError::Malformed(format!("unknown node id: {cfg_id}")))?;
        Ok(&self.nodes[*index])
    }
}

impl ConfigSource for JsonConfigSource {
    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn get_node(&self, index: usize) -> Result<NodeRecord, HostError> {
        let node = self.nodes.get(index).ok_or(HostError::IndexOutOfRange(index))?;
        let field = |key: &str| -> Result<String, HostError> {
            node.get(key)
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| HostError::MissingField { node: index.to_string(), key: key.to_string() })
        };
        Ok(NodeRecord { type_tag: field("type")?, cfg_id: field("id")?, display_name: field("name")? })
    }

    fn get_str(&self, cfg_id: &str, key: &str) -> Result<String, HostError> {
        let node = self.node_value(cfg_id)?;
        node.get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| HostError::MissingField { node: cfg_id.to_string(), key: key.to_string() })
    }

    fn get_int(&self, cfg_id: &str, key: &str) -> Result<i64, HostError> {
        let node = self.node_value(cfg_id)?;
        node.get(key)
            .and_then(Value::as_i64)
            .ok_or_else(|| HostError::MissingField { node: cfg_id.to_string(), key: key.to_string() })
    }

    /// A missing `key` is treated as an empty array (index 0 is already
    /// out of range) rather than a malformed document — most nodes have no
    /// wires at all, and the wire list has no separate "is present" check.
    fn get_str_from_array(&self, cfg_id: &str, key: &str, index: usize) -> Result<String, HostError> {
        let node = self.node_value(cfg_id)?;
        match node.get(key) {
            None => Err(HostError::IndexOutOfRange(index)),
            Some(Value::Array(items)) => {
                items.get(index).and_then(Value::as_str).map(str::to_string).ok_or(HostError::IndexOutOfRange(index))
            }
            Some(_) => Err(HostError::WrongType { node: cfg_id.to_string(), key: key.to_string() }),
        }
    }
}

#[cfg(test)]
#[path = "json_source_tests.rs"]
mod tests;
