// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Flow Runtime Authors

//! Configuration contract and flow bootstrap.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

mod config;
mod error;
mod host_node;
mod json_source;

pub use config::{collect_wires, ConfigSource, NodeRecord};
pub use error::HostError;
pub use host_node::start;
pub use json_source::JsonConfigSource;
