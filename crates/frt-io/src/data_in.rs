// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Flow Runtime Authors

//! Data-in adapter: bridges a byte-oriented [`Stream`] into typed messages
//! for its owning node.
//!
//! The JSON mode's framing is a byte-at-a-time state machine: a small
//! struct tracks just enough state to decide, one byte at a time, whether
//! the frame is still open, so an object split across any number of reads
//! frames identically to one that arrives whole.

use frt_core::{CoreError, EventMask, Message, MessageHeap, MessagePayload, Stream};

/// Selects how raw bytes become messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataInMode {
    /// One record is emitted per data-available signal; the receiving node
    /// pulls the bytes itself. The payload carries only the byte count —
    /// the owner already holds the stream handle it needs to read from.
    DataAvailable,
    /// Up to `max_size` bytes are read immediately and emitted as a `Buffer`.
    Buffer,
    /// Bytes are accumulated until a balanced top-level `{...}` object
    /// closes, then emitted as one `String` message.
    Json,
}

struct JsonFramer {
    depth: u32,
    armed: bool,
    buf: String,
}

impl JsonFramer {
    fn new() -> Self {
        Self { depth: 0, armed: false, buf: String::new() }
    }

    fn reset(&mut self) {
        self.depth = 0;
        self.armed = false;
        self.buf.clear();
    }

    /// Feed one byte. Returns `Some(object)` once a balanced object closes.
    ///
    /// Brace characters inside string literals are not treated specially —
    /// an embedded `{` or `}` inside a quoted string will desynchronize the
    /// depth count. Callers that need JSON-string-aware framing must layer
    /// a full parser above this adapter.
    fn push(&mut self, byte: u8) -> Option<String> {
        let ch = byte as char;
        if !self.armed {
            if ch == '{' {
                self.armed = true;
                self.depth = 1;
                self.buf.push(ch);
            }
            return None;
        }

        self.buf.push(ch);
        match ch {
            '{' => self.depth += 1,
            '}' => {
                self.depth -= 1;
                if self.depth == 0 {
                    let out = std::mem::take(&mut self.buf);
                    self.reset();
                    return Some(out);
                }
            }
            _ => {}
        }
        None
    }

    fn len(&self) -> usize {
        self.buf.len()
    }
}

/// The adapter's own failure state: an unknown configured mode rejects
/// events rather than guessing a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AdapterState {
    Active,
    Invalid,
}

/// Bridges a [`Stream`] into typed `Message`s for one node.
pub struct DataInAdapter<S: Stream> {
    stream: S,
    mode: DataInMode,
    max_size: usize,
    state: AdapterState,
    framer: JsonFramer,
}

impl<S: Stream> DataInAdapter<S> {
    pub fn new(stream: S, mode: DataInMode, max_size: usize) -> Self {
        Self { stream, mode, max_size, state: AdapterState::Active, framer: JsonFramer::new() }
    }

    /// Construct an adapter whose configured mode did not resolve to a
    /// known [`DataInMode`]. The adapter still exists and owns `stream`,
    /// but rejects every event.
    pub fn invalid(stream: S) -> Self {
        Self { stream, mode: DataInMode::Buffer, max_size: 0, state: AdapterState::Invalid, framer: JsonFramer::new() }
    }

    pub fn is_valid(&self) -> bool {
        self.state == AdapterState::Active
    }

    /// Handle a `DATA_AVAIL` event: produce at most one message, and report
    /// whether the caller should self-post another `DATA_AVAIL` because
    /// bytes remain — the adapter never loops inside a single callback, so
    /// a chatty stream cannot starve the rest of the flow.
    pub fn on_data_available(&mut self) -> Result<(Option<Message>, EventMask), CoreError> {
        if self.state == AdapterState::Invalid {
            return Err(CoreError::InvalidState("data-in adapter mode is not configured".into()));
        }

        let message = match self.mode {
            DataInMode::DataAvailable => {
                let available = self.stream.available();
                Some(MessageHeap.alloc("data", MessagePayload::DataAvailable { available }))
            }
            DataInMode::Buffer => self.read_buffer()?,
            DataInMode::Json => self.read_json()?,
        };

        // DataAvailable mode leaves the bytes for the receiving node to
        // pull, so re-signalling would loop forever on the same bytes.
        let more_pending = self.mode != DataInMode::DataAvailable && self.stream.available() > 0;
        let follow_up = if more_pending { EventMask::DATA_AVAIL } else { EventMask::NONE };
        Ok((message, follow_up))
    }

    /// On a failed read the stream's buffered bytes are discarded to avoid
    /// unbounded buildup, then the error is reported to the owner.
    fn read_buffer(&mut self) -> Result<Option<Message>, CoreError> {
        let mut buf = vec![0u8; self.max_size];
        let n = match self.stream.read(&mut buf) {
            Ok(n) => n,
            Err(err) => {
                self.stream.clear();
                return Err(err);
            }
        };
        if n == 0 {
            return Ok(None);
        }
        buf.truncate(n);
        Ok(Some(MessageHeap.alloc("data", MessagePayload::Buffer(buf))))
    }

    fn read_json(&mut self) -> Result<Option<Message>, CoreError> {
        let mut byte = [0u8; 1];
        loop {
            let n = self.stream.read(&mut byte)?;
            if n == 0 {
                return Ok(None);
            }
            if let Some(object) = self.framer.push(byte[0]) {
                return Ok(Some(MessageHeap.alloc("data", MessagePayload::Str(object))));
            }
            if self.framer.len() >= self.max_size.saturating_sub(1) {
                tracing::debug!(max_size = self.max_size, "dropping unterminated frame");
                self.framer.reset();
                return Err(CoreError::OutOfMemory(self.max_size));
            }
            if self.stream.available() == 0 {
                return Ok(None);
            }
        }
    }
}

#[cfg(test)]
#[path = "data_in_tests.rs"]
mod tests;
