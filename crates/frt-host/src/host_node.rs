// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Flow Runtime Authors

//! The Host node: installs a configuration document and starts the flow.

use crate::config::{collect_wires, ConfigSource};
use crate::error::HostError;
use frt_core::{CoreError, NodeId, NodeIdentity, NodeState};
use frt_dispatcher::Dispatcher;
use tracing::{info, warn};

/// Install `config` onto `dispatcher`.
///
/// On re-entry this first tears down every node already running (stop →
/// deinit → drop), then allocates, initialises, and starts each configured
/// node in document order. One node's failure never takes the flow down
/// with it: a node whose `init` or `start` fails is left in its terminal
/// `Error` state, and a node whose type tag has no registered constructor
/// is skipped outright — the rest of the flow continues. Only structural
/// errors (a duplicate id, an unreadable document) abort the install.
pub fn start(dispatcher: &Dispatcher, config: &dyn ConfigSource) -> Result<(), HostError> {
    dispatcher.shutdown_flow();
    info!(nodes = config.node_count(), "installing flow configuration");

    for index in 0..config.node_count() {
        let record = config.get_node(index)?;
        let wires = collect_wires(config, &record.cfg_id)?
            .into_iter()
            .map(NodeId::new)
            .collect::<Vec<_>>();
        let identity = NodeIdentity::new(record.cfg_id.clone(), record.display_name, record.type_tag, wires)?;
        match dispatcher.node_alloc(identity) {
            Ok(()) => {}
            Err(CoreError::InvalidConfig(reason)) => {
                warn!(node = %record.cfg_id, %reason, "skipping node that cannot be constructed");
            }
            Err(other) => return Err(other.into()),
        }
    }

    for index in 0..config.node_count() {
        let record = config.get_node(index)?;
        match dispatcher.node_state(&record.cfg_id) {
            Ok(NodeState::Error) => {
                warn!(node = %record.cfg_id, "skipping start: node failed to initialise");
            }
            Ok(_) => {
                dispatcher.start_node(&record.cfg_id)?;
            }
            // Never constructed; already reported above.
            Err(CoreError::NodeNotFound(_)) => {}
            Err(other) => return Err(other.into()),
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "host_node_tests.rs"]
mod tests;
