// Copyright 2026 the Geyser Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated TE line and binding.
//!
//! [`SimTeLine`] stands in for the platform's named edge-triggered input
//! line. Claiming it yields a [`SimTeBinding`] that upholds the
//! [`TeBinding`] contract: freshly claimed bindings are masked, and
//! enable/disable are idempotent from any thread. [`SimTeLine::fire`] plays
//! the role of the hardware edge.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use geyser_core::irq::{IrqError, TeBinding, TePulse};

/// A claimable simulated TE line.
pub struct SimTeLine {
    claimed: AtomicBool,
    armed: AtomicBool,
    handler: Mutex<Option<Arc<dyn TePulse>>>,
    delivered: AtomicU64,
    suppressed: AtomicU64,
    fail_next_release: AtomicBool,
}

impl SimTeLine {
    /// A fresh, unclaimed, masked line.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            claimed: AtomicBool::new(false),
            armed: AtomicBool::new(false),
            handler: Mutex::new(None),
            delivered: AtomicU64::new(0),
            suppressed: AtomicU64::new(0),
            fail_next_release: AtomicBool::new(false),
        })
    }

    /// Claims the line and registers `handler`, masked.
    ///
    /// # Errors
    ///
    /// [`IrqError::Busy`] while a previous claim has not been released.
    pub fn claim(line: &Arc<Self>, handler: Arc<dyn TePulse>) -> Result<SimTeBinding, IrqError> {
        if line.claimed.swap(true, Ordering::SeqCst) {
            return Err(IrqError::Busy);
        }
        line.armed.store(false, Ordering::SeqCst);
        *line.handler_slot() = Some(handler);
        Ok(SimTeBinding {
            line: Arc::clone(line),
        })
    }

    /// Simulates one rising edge. Delivered to the handler only while the
    /// line is claimed and armed; otherwise counted as suppressed.
    pub fn fire(&self) {
        if self.armed.load(Ordering::SeqCst) {
            let handler = self.handler_slot().clone();
            if let Some(handler) = handler {
                handler.pulse();
                self.delivered.fetch_add(1, Ordering::Relaxed);
                return;
            }
        }
        self.suppressed.fetch_add(1, Ordering::Relaxed);
    }

    /// Whether the line is currently claimed.
    #[must_use]
    pub fn is_claimed(&self) -> bool {
        self.claimed.load(Ordering::SeqCst)
    }

    /// Whether pulses are currently delivered.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::SeqCst)
    }

    /// Pulses delivered to the handler.
    #[must_use]
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    /// Pulses dropped while masked or unclaimed.
    #[must_use]
    pub fn suppressed(&self) -> u64 {
        self.suppressed.load(Ordering::Relaxed)
    }

    /// Scripts the next release to report [`IrqError::ReleaseFailed`]. The
    /// line is still freed — this exercises the caller's log-and-continue
    /// path.
    pub fn fail_next_release(&self) {
        self.fail_next_release.store(true, Ordering::SeqCst);
    }

    fn handler_slot(&self) -> std::sync::MutexGuard<'_, Option<Arc<dyn TePulse>>> {
        self.handler.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for SimTeLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimTeLine")
            .field("claimed", &self.is_claimed())
            .field("armed", &self.is_armed())
            .field("delivered", &self.delivered())
            .field("suppressed", &self.suppressed())
            .finish_non_exhaustive()
    }
}

/// An active claim on a [`SimTeLine`].
pub struct SimTeBinding {
    line: Arc<SimTeLine>,
}

impl TeBinding for SimTeBinding {
    fn enable(&self) {
        self.line.armed.store(true, Ordering::SeqCst);
    }

    fn disable(&self) {
        self.line.armed.store(false, Ordering::SeqCst);
    }

    fn release(self: Box<Self>) -> Result<(), IrqError> {
        self.line.armed.store(false, Ordering::SeqCst);
        *self.line.handler_slot() = None;
        self.line.claimed.store(false, Ordering::SeqCst);
        if self.line.fail_next_release.swap(false, Ordering::SeqCst) {
            log::debug!("simulated te release failure");
            return Err(IrqError::ReleaseFailed);
        }
        Ok(())
    }
}

impl fmt::Debug for SimTeBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimTeBinding")
            .field("line", &self.line)
            .finish()
    }
}
