// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Flow Runtime Authors

//! Data-out adapter: the `Idle` / `TxBuf` / `TxDataAvail` write state
//! machine that drains messages onto a [`Stream`].
//!
//! `write_complete` is not inferred from the synchronous [`Stream::write`]
//! return value — it is delivered from outside, the same way a UART DMA
//! completion interrupt would arrive, and the owning node is expected to
//! forward that event into [`DataOutAdapter::on_write_complete`].

use frt_core::{CoreError, Message, MessagePayload, Stream};

/// Pulls bytes on demand for `DataAvailable`-mode writes. The message that
/// triggers a write carries no bytes itself; the owning node supplies this
/// callback at construction to read from wherever its data actually lives.
pub struct ReadCallback(Box<dyn FnMut(&mut [u8]) -> Result<usize, CoreError> + Send>);

impl ReadCallback {
    pub fn new(f: impl FnMut(&mut [u8]) -> Result<usize, CoreError> + Send + 'static) -> Self {
        Self(Box::new(f))
    }

    fn call(&mut self, buf: &mut [u8]) -> Result<usize, CoreError> {
        (self.0)(buf)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutState {
    Idle,
    TxBuf,
    TxDataAvail,
}

pub struct DataOutAdapter<S: Stream> {
    stream: S,
    state: OutState,
    read_cb: ReadCallback,
    scratch: Vec<u8>,
    /// The message currently in flight while `state == TxBuf`, kept so its
    /// forward chain can be walked one link per `write_complete`.
    pending: Option<Message>,
}

impl<S: Stream> DataOutAdapter<S> {
    pub fn new(stream: S, read_cb: ReadCallback, scratch_size: usize) -> Self {
        Self { stream, state: OutState::Idle, read_cb, scratch: vec![0u8; scratch_size], pending: None }
    }

    pub fn state(&self) -> OutState {
        self.state
    }

    /// Deliver a message to the adapter. A message arriving while a write
    /// is already in flight is dropped rather than queued — the dispatcher
    /// inbox is the queue; duplicating it here would hold two copies of
    /// every backlogged buffer.
    pub fn on_message(&mut self, msg: Message) -> Result<(), CoreError> {
        if self.state != OutState::Idle {
            tracing::debug!(state = ?self.state, "write in flight, dropping newest message");
            return msg.free();
        }
        match msg.payload() {
            MessagePayload::Buffer(bytes) => {
                let bytes = bytes.clone();
                self.start_buffer_write(msg, bytes)
            }
            MessagePayload::DataAvailable { .. } => self.start_data_available_write(msg),
            _ => msg.free(),
        }
    }

    /// Deliver a `write_complete` notification for the write this adapter
    /// currently has outstanding.
    pub fn on_write_complete(&mut self) -> Result<(), CoreError> {
        match self.state {
            OutState::Idle => Ok(()),
            OutState::TxBuf => self.advance_tx_buf(),
            OutState::TxDataAvail => self.advance_tx_data_available(),
        }
    }

    fn start_buffer_write(&mut self, msg: Message, bytes: Vec<u8>) -> Result<(), CoreError> {
        if bytes.is_empty() {
            self.state = OutState::Idle;
            return msg.free();
        }
        match self.stream.write(&bytes) {
            Ok(_) => {
                self.pending = Some(msg);
                self.state = OutState::TxBuf;
                Ok(())
            }
            Err(err) => {
                self.state = OutState::Idle;
                msg.free()?;
                Err(err)
            }
        }
    }

    fn advance_tx_buf(&mut self) -> Result<(), CoreError> {
        let mut msg = self
            .pending
            .take()
            .ok_or_else(|| CoreError::InvalidState("write-complete in TxBuf state with no pending message".into()))?;
        let next = msg.take_next();
        msg.free()?;

        match next {
            Some(next_msg) => {
                let bytes = match next_msg.payload() {
                    MessagePayload::Buffer(b) => b.clone(),
                    _ => Vec::new(),
                };
                self.start_buffer_write(next_msg, bytes)
            }
            None => {
                self.state = OutState::Idle;
                Ok(())
            }
        }
    }

    fn start_data_available_write(&mut self, msg: Message) -> Result<(), CoreError> {
        msg.free()?;
        let n = self.read_cb.call(&mut self.scratch)?;
        if n == 0 {
            self.state = OutState::Idle;
            return Ok(());
        }
        match self.stream.write(&self.scratch[..n]) {
            Ok(_) => {
                self.state = OutState::TxDataAvail;
                Ok(())
            }
            Err(err) => {
                self.state = OutState::Idle;
                Err(err)
            }
        }
    }

    fn advance_tx_data_available(&mut self) -> Result<(), CoreError> {
        let n = self.read_cb.call(&mut self.scratch)?;
        if n == 0 {
            self.state = OutState::Idle;
            return Ok(());
        }
        match self.stream.write(&self.scratch[..n]) {
            Ok(_) => Ok(()),
            Err(err) => {
                self.state = OutState::Idle;
                Err(err)
            }
        }
    }
}

#[cfg(test)]
#[path = "data_out_tests.rs"]
mod tests;
