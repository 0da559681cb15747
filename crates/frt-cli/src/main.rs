// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Flow Runtime Authors

use clap::Parser;
use frt_cli::Args;
use frt_dispatcher::NodeFactory;
use std::process::ExitCode;

fn main() -> ExitCode {
    frt_cli::logging::init();
    let args = Args::parse();

    // Node constructors (inject, debug, serial, ...) are registered here
    // by the node library linked into the final firmware image.
    let factory = NodeFactory::new();

    match frt_cli::run(&args, factory) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "bootstrap failed");
            ExitCode::from(err.exit_code())
        }
    }
}
