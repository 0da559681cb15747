// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Flow Runtime Authors

//! Timer wheel: clock-driven one-shot scheduling on a dedicated scanning
//! thread.
//!
//! Outstanding timers live on a single unsorted list a background thread
//! polls against a [`Clock`] at a fixed resolution. The population is small
//! (tens, not thousands) and the resolution already bounds jitter, so a
//! linear scan beats maintaining a sorted structure. Delivery is
//! at-most-once: cancelling a timer that already fired is simply a no-op.

use frt_core::{Clock, EventMask, NodeId, TimerHandle, TimerRecord};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// What the wheel hands back to the dispatcher when a timer fires.
pub struct Fired {
    pub target: NodeId,
    pub mask: EventMask,
    pub priority: i8,
}

struct Shared {
    pending: Mutex<Vec<TimerRecord>>,
}

/// A running timer wheel. Dropping it stops the scanning thread.
pub struct TimerWheel {
    shared: Arc<Shared>,
    clock: Arc<dyn Clock>,
    resolution: Duration,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl TimerWheel {
    /// Spawn the scanning thread. `resolution` bounds worst-case delivery
    /// jitter; `on_fire` is invoked from the scanning thread itself, so it
    /// must not block — the dispatcher's callback just posts to the inbox.
    // Failure to spawn the scanning thread is unrecoverable at bootstrap.
    #[allow(clippy::expect_used)]
    pub fn spawn<C, F>(clock: C, resolution: Duration, on_fire: F) -> Self
    where
        C: Clock + 'static,
        F: Fn(Fired) + Send + 'static,
    {
        let shared = Arc::new(Shared { pending: Mutex::new(Vec::new()) });
        let stop = Arc::new(AtomicBool::new(false));
        let clock: Arc<dyn Clock> = Arc::new(clock);

        let scan_shared = Arc::clone(&shared);
        let scan_stop = Arc::clone(&stop);
        let scan_clock = Arc::clone(&clock);
        let handle = std::thread::Builder::new()
            .name("frt-timer-wheel".into())
            .spawn(move || {
                while !scan_stop.load(Ordering::Acquire) {
                    let now = scan_clock.now();
                    let due: Vec<TimerRecord> = {
                        let mut pending = scan_shared.pending.lock();
                        let due_idx: Vec<usize> = pending
                            .iter()
                            .enumerate()
                            .filter(|(_, t)| t.deadline <= now)
                            .map(|(i, _)| i)
                            .collect();
                        due_idx
                            .into_iter()
                            .rev()
                            .map(|i| pending.swap_remove(i))
                            .collect()
                    };
                    for timer in due {
                        on_fire(Fired { target: timer.target, mask: timer.mask, priority: timer.priority });
                    }
                    std::thread::sleep(resolution);
                }
            })
            .expect("failed to spawn timer wheel thread");

        Self { shared, clock, resolution, stop, handle: Some(handle) }
    }

    /// Schedule a one-shot timer and return its handle. The scan resolution
    /// is the minimum meaningful delay; sub-resolution requests round up.
    pub fn after(&self, delay: Duration, target: NodeId, mask: EventMask, priority: i8) -> TimerHandle {
        let handle = TimerHandle::next();
        let delay = delay.max(self.resolution);
        let record = TimerRecord { handle, deadline: self.clock.now() + delay, target, mask, priority };
        self.shared.pending.lock().push(record);
        handle
    }

    /// Cancel a pending timer. Returns `true` if it was still pending;
    /// `false` if it had already fired or never existed — both are
    /// non-errors, per the at-most-once delivery contract.
    pub fn cancel(&self, handle: TimerHandle) -> bool {
        let mut pending = self.shared.pending.lock();
        let before = pending.len();
        pending.retain(|t| t.handle != handle);
        pending.len() != before
    }

    pub fn pending_count(&self) -> usize {
        self.shared.pending.lock().len()
    }
}

impl Drop for TimerWheel {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
#[path = "timer_wheel_tests.rs"]
mod tests;
