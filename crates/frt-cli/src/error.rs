// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Flow Runtime Authors

//! Errors that abort bootstrap, mapped onto process exit codes.

use frt_host::HostError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Bootstrap(#[from] HostError),
}

impl CliError {
    /// Exit code handed back to the OS. Anything non-zero means the flow
    /// never came up.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Bootstrap(_) => 1,
        }
    }
}
