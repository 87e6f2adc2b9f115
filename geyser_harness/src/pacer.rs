// Copyright 2026 the Geyser Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Background TE pulse source.
//!
//! [`TePacer`] plays the role of a command-mode panel's refresh engine:
//! it fires a [`SimTeLine`] once per interval until stopped. Pacing is
//! drift-corrected against `CLOCK_MONOTONIC` rather than accumulated from
//! sleep durations, so long runs stay on the nominal refresh grid.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use rustix::time::{ClockId, Timespec, clock_gettime};

use crate::te::SimTeLine;

/// Fires a TE line at a fixed refresh interval on a background thread.
pub struct TePacer {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl TePacer {
    /// Spawns a pacer firing `line` every `interval`.
    #[must_use]
    pub fn spawn(line: Arc<SimTeLine>, interval: Duration) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let handle = {
            let stop = Arc::clone(&stop);
            std::thread::spawn(move || {
                let start = monotonic_now();
                let mut edges: u32 = 0;
                while !stop.load(Ordering::Relaxed) {
                    line.fire();
                    edges += 1;
                    let target = start + interval * edges;
                    let now = monotonic_now();
                    if target > now {
                        std::thread::sleep(target - now);
                    }
                }
            })
        };
        Self {
            stop,
            handle: Some(handle),
        }
    }

    /// Stops the pacer and joins the thread.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("te pacer thread panicked");
            }
        }
    }
}

impl Drop for TePacer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl fmt::Debug for TePacer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TePacer")
            .field("stopped", &self.stop.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

fn monotonic_now() -> Duration {
    let timespec: Timespec = clock_gettime(ClockId::Monotonic);
    let seconds = u64::try_from(timespec.tv_sec).unwrap_or(0);
    let nanos = u32::try_from(timespec.tv_nsec)
        .unwrap_or(0)
        .min(999_999_999);
    Duration::new(seconds, nanos)
}

#[cfg(test)]
mod tests {
    use super::monotonic_now;

    #[test]
    fn monotonic_clock_does_not_go_backwards() {
        let first = monotonic_now();
        let second = monotonic_now();
        assert!(second >= first, "monotonic clock should not go backwards");
    }
}
