// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Flow Runtime Authors

//! Node factory: maps a configuration `type_tag` to a constructor.

use frt_core::{CoreError, Node, NodeIdentity};
use std::collections::HashMap;

type Constructor = Box<dyn Fn(&NodeIdentity) -> Box<dyn Node> + Send + Sync>;

/// Registry of node constructors, keyed by the `type_tag` configuration
/// authors write in their flow document.
#[derive(Default)]
pub struct NodeFactory {
    constructors: HashMap<String, Constructor>,
}

impl NodeFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor for `type_tag`. A second registration for
    /// the same tag is rejected rather than silently replacing the first.
    ///
    /// Constructors must be pure with respect to the wider system: they
    /// may read configuration, but must not send messages or start timers.
    pub fn register<F>(&mut self, type_tag: impl Into<String>, ctor: F) -> Result<(), CoreError>
    where
        F: Fn(&NodeIdentity) -> Box<dyn Node> + Send + Sync + 'static,
    {
        let tag = type_tag.into();
        if self.constructors.contains_key(&tag) {
            return Err(CoreError::DuplicateTypeTag(tag));
        }
        self.constructors.insert(tag, Box::new(ctor));
        Ok(())
    }

    pub fn build(&self, identity: &NodeIdentity) -> Result<Box<dyn Node>, CoreError> {
        let ctor = self
            .constructors
            .get(identity.type_tag.as_str())
            .ok_or_else(|| CoreError::InvalidConfig(format!("unknown node type_tag: {}", identity.type_tag)))?;
        Ok(ctor(identity))
    }

    pub fn is_registered(&self, type_tag: &str) -> bool {
        self.constructors.contains_key(type_tag)
    }
}

#[cfg(test)]
#[path = "factory_tests.rs"]
mod tests;
