// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Flow Runtime Authors

//! In-memory [`Stream`] fixture shared by this crate's tests.

use frt_core::{CoreError, Stream};
use std::collections::VecDeque;

#[derive(Default)]
pub(crate) struct MemStream {
    pub(crate) inbound: VecDeque<u8>,
    pub(crate) outbound: Vec<u8>,
    pub(crate) fail_next_read: bool,
    pub(crate) fail_next_write: bool,
}

impl MemStream {
    pub(crate) fn with_bytes(bytes: &[u8]) -> Self {
        Self { inbound: VecDeque::from(bytes.to_vec()), ..Self::default() }
    }

    pub(crate) fn feed(&mut self, bytes: &[u8]) {
        self.inbound.extend(bytes);
    }
}

impl Stream for MemStream {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, CoreError> {
        if self.fail_next_read {
            self.fail_next_read = false;
            return Err(CoreError::InvalidState("stream read failed".into()));
        }
        let mut n = 0;
        while n < buf.len() {
            match self.inbound.pop_front() {
                Some(b) => {
                    buf[n] = b;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }

    fn available(&self) -> usize {
        self.inbound.len()
    }

    fn clear(&mut self) {
        self.inbound.clear();
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize, CoreError> {
        if self.fail_next_write {
            self.fail_next_write = false;
            return Err(CoreError::InvalidState("stream write failed".into()));
        }
        self.outbound.extend_from_slice(buf);
        Ok(buf.len())
    }
}
