// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Flow Runtime Authors

//! Wires the dispatcher, timer wheel, and host together, then drives the
//! worker loop on the calling thread.

use crate::args::Args;
use crate::error::CliError;
use frt_core::SystemClock;
use frt_dispatcher::{Dispatcher, NodeFactory};
use frt_host::JsonConfigSource;
use std::time::Duration;
use tracing::info;

/// Scan resolution of the timer wheel, and therefore the minimum
/// meaningful timeout a node can ask for.
const TIMER_RESOLUTION: Duration = Duration::from_millis(32);

/// Build a dispatcher around `factory` and install the configured flow,
/// without entering the worker loop.
pub fn bootstrap(args: &Args, factory: NodeFactory) -> Result<Dispatcher, CliError> {
    let dispatcher = Dispatcher::new(factory);
    dispatcher.start_timers(SystemClock, TIMER_RESOLUTION);

    let config = match &args.flow {
        Some(path) => {
            info!(path = %path.display(), "loading flow document");
            JsonConfigSource::from_file(path)?
        }
        None => JsonConfigSource::parse("[]")?,
    };
    frt_host::start(&dispatcher, &config)?;
    Ok(dispatcher)
}

/// Bootstrap and run the flow until the process is terminated.
pub fn run(args: &Args, factory: NodeFactory) -> Result<(), CliError> {
    let dispatcher = bootstrap(args, factory)?;
    info!(nodes = dispatcher.node_count(), "flow running");
    dispatcher.run_forever();
    Ok(())
}

#[cfg(test)]
#[path = "bootstrap_tests.rs"]
mod tests;
