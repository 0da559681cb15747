// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Flow Runtime Authors

//! Status bus: fan-out of node status updates to registered listener
//! nodes. `set` allocates one `Status` message per matching listener and
//! sends it through the dispatcher's normal inbox — a status update is not
//! special-cased delivery, it is just another message a node receives.

use crate::dispatcher::Dispatcher;
use frt_core::{CoreError, MessageHeap, MessagePayload, NodeId, StatusKind};
use parking_lot::Mutex;

struct Subscription {
    listener: NodeId,
    group: Option<String>,
}

/// Registry of status listeners, keyed by node handle — a node may only
/// register once.
#[derive(Default)]
pub struct StatusBus {
    subscriptions: Mutex<Vec<Subscription>>,
}

impl StatusBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `listener` to status updates, optionally restricted to one
    /// group (`None` = listen-all). Re-registering the same listener
    /// replaces its group filter rather than adding a second entry, so the
    /// round-trip `start_listen; stop_listen` stays idempotent under
    /// repetition regardless of how many times `start_listen` ran first.
    pub fn start_listen(&self, listener: NodeId, group: Option<String>) {
        let mut subscriptions = self.subscriptions.lock();
        match subscriptions.iter_mut().find(|s| s.listener == listener) {
            Some(existing) => existing.group = group,
            None => subscriptions.push(Subscription { listener, group }),
        }
    }

    /// Unsubscribe. Idempotent: calling this for a listener that is not (or
    /// no longer) registered is a no-op.
    pub fn stop_listen(&self, listener: &NodeId) {
        self.subscriptions.lock().retain(|s| &s.listener != listener);
    }

    /// Publish a status update: allocate one `Status` message per listener
    /// whose group matches (`None` group on the subscription = listen-all)
    /// and hand each through `dispatcher.send_msg_to`.
    pub fn set(
        &self,
        dispatcher: &Dispatcher,
        group: &str,
        kind: StatusKind,
        text: &str,
        priority: i8,
    ) -> Result<(), CoreError> {
        let subscriptions = self.subscriptions.lock();
        for sub in subscriptions.iter().filter(|s| match &s.group {
            Some(g) => g == group,
            None => true,
        }) {
            let msg = MessageHeap.alloc(group, MessagePayload::Status { kind, text: text.to_string() });
            match dispatcher.send_msg_to(sub.listener.as_str(), msg, priority) {
                Ok(()) => {}
                // A listener mid-teardown should not starve the remaining
                // listeners of the update.
                Err(CoreError::NodeNotFound(_)) => continue,
                Err(other) => return Err(other),
            }
        }
        Ok(())
    }

    pub fn listener_count(&self) -> usize {
        self.subscriptions.lock().len()
    }
}

#[cfg(test)]
#[path = "status_bus_tests.rs"]
mod tests;
