// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Flow Runtime Authors

//! Command-line surface: one optional path to a flow document.

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "frt", about = "Flow-based runtime for small devices", version)]
pub struct Args {
    /// Path to the JSON flow document to install at startup. Without one
    /// the runtime comes up with an empty flow.
    pub flow: Option<PathBuf>,
}

#[cfg(test)]
#[path = "args_tests.rs"]
mod tests;
