// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Flow Runtime Authors

//! Line-oriented logging with a `D:HH:MM:SS:mmm` prefix counting time
//! since process start. Elapsed time, not wall-clock: on a small device
//! the wall clock may not be set at all, and "how long after boot did
//! this happen" is the question a log reader is actually asking.

use std::fmt;
use std::time::{Duration, Instant};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::EnvFilter;

/// Timestamps log lines with the time elapsed since this value was built.
pub struct ProcessElapsed {
    start: Instant,
}

impl ProcessElapsed {
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }
}

impl Default for ProcessElapsed {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatTime for ProcessElapsed {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        w.write_str(&format_elapsed(self.start.elapsed()))
    }
}

/// Render an elapsed duration as `D:HH:MM:SS:mmm`. Hours widen past two
/// digits rather than wrapping; the runtime may stay up for weeks.
fn format_elapsed(elapsed: Duration) -> String {
    let ms = elapsed.as_millis();
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;
    format!("D:{hours:02}:{minutes:02}:{seconds:02}:{millis:03}")
}

/// Install the global subscriber: severity tag, elapsed-time prefix, one
/// line per event. Quietly does nothing if a subscriber is already set,
/// so tests can call it repeatedly.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(ProcessElapsed::new())
        .with_target(false)
        .try_init();
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
