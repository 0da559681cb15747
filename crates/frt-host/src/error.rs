// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Flow Runtime Authors

//! Errors raised while reading configuration or bootstrapping a flow.

use frt_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("configuration index {0} out of range")]
    IndexOutOfRange(usize),

    #[error("node {node} missing required field {key}")]
    MissingField { node: String, key: String },

    #[error("node {node} field {key} has the wrong type")]
    WrongType { node: String, key: String },

    #[error("malformed configuration document: {0}")]
    Malformed(String),

    #[error("failed to read configuration file {path}: {source}")]
    Io { path: String, source: std::io::Error },

    #[error(transparent)]
    Core(#[from] CoreError),
}
