// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Flow Runtime Authors

//! Stream-based data-in and data-out adapters.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

mod data_in;
mod data_out;

#[cfg(test)]
mod test_stream;

pub use data_in::{DataInAdapter, DataInMode};
pub use data_out::{DataOutAdapter, OutState, ReadCallback};
