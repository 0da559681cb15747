// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Flow Runtime Authors

//! Node, timer, and allocation identifiers.

use std::borrow::Borrow;
use std::fmt;

/// A node's stable identity: the configuration id taken verbatim from the
/// flow document. Unlike [`crate::define_counter_id!`] handles, this is not
/// generated — it is whatever the configuration author wrote, so wires can
/// name it before the node exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl PartialEq<str> for NodeId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

crate::define_counter_id! {
    /// Handle returned by `TimerWheel::after`, used only to `cancel` a
    /// still-pending timer. Never serialized, never crosses a node boundary.
    pub struct TimerHandle;
}

crate::define_counter_id! {
    /// Monotonically increasing sequence number used to break ties between
    /// inbox entries of equal priority (earlier insertion wins).
    pub struct InboxSeq;
}

#[cfg(test)]
#[path = "ids_tests.rs"]
mod tests;
