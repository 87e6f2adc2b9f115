// Copyright 2026 the Geyser Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transfer records and their completion contract.
//!
//! A [`Transfer`] describes one outbound/inbound packet exchange. It is
//! jointly owned while in flight: the enqueuing caller waits on the
//! completion, the transport engine advances the progress counters and
//! fires the completion exactly once. The record's packet and flags are
//! immutable for its whole lifetime.
//!
//! The engine-facing methods ([`record_tx`](Transfer::record_tx),
//! [`record_rx`](Transfer::record_rx), [`complete`](Transfer::complete))
//! and the caller-facing [`wait`](Transfer::wait) are the entire contract;
//! how and when the engine services the queue is its own concern.

use std::sync::{Condvar, Mutex, PoisonError};

use geyser_core::packet::{Packet, TransferError, TransferFlags};

use crate::sync::lock;

/// Bytes moved so far, engine-maintained.
#[derive(Clone, Copy, Debug, Default)]
struct Progress {
    tx_done: u16,
    rx_done: u16,
}

/// One-shot completion signal.
///
/// Fired exactly once by the transport engine; waiting after the fact
/// returns the stored result immediately.
#[derive(Debug, Default)]
struct Completion {
    result: Mutex<Option<Result<(), TransferError>>>,
    cond: Condvar,
}

impl Completion {
    /// Stores `result` and wakes all waiters. Returns `false` (leaving the
    /// first result in place) if the completion already fired.
    fn fire(&self, result: Result<(), TransferError>) -> bool {
        let mut slot = lock(&self.result);
        if slot.is_some() {
            return false;
        }
        *slot = Some(result);
        self.cond.notify_all();
        true
    }

    fn wait(&self) -> Result<(), TransferError> {
        let mut slot = lock(&self.result);
        loop {
            if let Some(result) = *slot {
                return result;
            }
            slot = self
                .cond
                .wait(slot)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    fn peek(&self) -> Option<Result<(), TransferError>> {
        *lock(&self.result)
    }
}

/// One queued packet exchange.
#[derive(Debug)]
pub struct Transfer {
    packet: Packet,
    flags: TransferFlags,
    rx_capacity: usize,
    progress: Mutex<Progress>,
    rx: Mutex<Vec<u8>>,
    completion: Completion,
}

impl Transfer {
    /// A write-only transfer: no reply expected, no receive buffer.
    #[must_use]
    pub fn write(packet: Packet) -> Self {
        Self::with_flags(packet, TransferFlags::empty(), 0)
    }

    /// A read transfer expecting a reply of at most `rx_capacity` bytes.
    #[must_use]
    pub fn read(packet: Packet, rx_capacity: usize) -> Self {
        Self::with_flags(packet, TransferFlags::EXPECT_REPLY, rx_capacity)
    }

    /// A transfer with explicit flags.
    ///
    /// `rx_capacity` is only meaningful when `flags` contains
    /// [`TransferFlags::EXPECT_REPLY`].
    #[must_use]
    pub fn with_flags(packet: Packet, flags: TransferFlags, rx_capacity: usize) -> Self {
        Self {
            packet,
            flags,
            rx_capacity,
            progress: Mutex::new(Progress::default()),
            rx: Mutex::new(Vec::new()),
            completion: Completion::default(),
        }
    }

    /// The packet to exchange.
    #[must_use]
    pub fn packet(&self) -> &Packet {
        &self.packet
    }

    /// Requested behavior flags.
    #[must_use]
    pub fn flags(&self) -> TransferFlags {
        self.flags
    }

    /// Receive-buffer capacity in bytes (0 for write-only transfers).
    #[must_use]
    pub fn rx_capacity(&self) -> usize {
        self.rx_capacity
    }

    // -- engine side -------------------------------------------------------

    /// Records `bytes` more transmitted bytes. Engine-only.
    pub fn record_tx(&self, bytes: u16) {
        let mut progress = lock(&self.progress);
        progress.tx_done = progress.tx_done.saturating_add(bytes);
    }

    /// Appends reply bytes to the receive buffer. Engine-only.
    ///
    /// # Errors
    ///
    /// [`TransferError::RxOverflow`] when `chunk` would exceed the caller's
    /// capacity; the buffer is left untouched and the engine is expected to
    /// complete the record with that error.
    pub fn record_rx(&self, chunk: &[u8]) -> Result<(), TransferError> {
        let mut rx = lock(&self.rx);
        if rx.len() + chunk.len() > self.rx_capacity {
            return Err(TransferError::RxOverflow);
        }
        rx.extend_from_slice(chunk);
        let received = u16::try_from(chunk.len()).unwrap_or(u16::MAX);
        let mut progress = lock(&self.progress);
        progress.rx_done = progress.rx_done.saturating_add(received);
        Ok(())
    }

    /// Fires the completion with the terminal result. Engine-only.
    ///
    /// Returns `false` if the record was already completed; the first
    /// result stays in place. Completing exactly once is the engine's
    /// obligation — this is a guard rail, not a second channel.
    pub fn complete(&self, result: Result<(), TransferError>) -> bool {
        self.completion.fire(result)
    }

    // -- caller side -------------------------------------------------------

    /// Blocks until the completion fires and returns the terminal result.
    ///
    /// Must not be called while holding the controller's queue guard.
    ///
    /// # Errors
    ///
    /// The [`TransferError`] the engine completed the record with.
    pub fn wait(&self) -> Result<(), TransferError> {
        self.completion.wait()
    }

    /// The terminal result, if the completion has fired.
    #[must_use]
    pub fn result(&self) -> Option<Result<(), TransferError>> {
        self.completion.peek()
    }

    /// `(tx_done, rx_done)` byte counters.
    #[must_use]
    pub fn progress(&self) -> (u16, u16) {
        let progress = lock(&self.progress);
        (progress.tx_done, progress.rx_done)
    }

    /// Takes the accumulated reply bytes. Meaningful after a successful
    /// [`wait`](Self::wait) on a read transfer.
    #[must_use]
    pub fn take_rx(&self) -> Vec<u8> {
        std::mem::take(&mut *lock(&self.rx))
    }
}
