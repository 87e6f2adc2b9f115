// Copyright 2026 the Geyser Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! FIFO transport-engine double.
//!
//! [`FifoEngine`] services a controller's transfer queue strictly in
//! enqueue order and completes each record exactly once. It dequeues
//! through [`DsiHost::dequeue`], so the queue guard is always released
//! before a completion fires — the deadlock-freedom half of the queue
//! contract.
//!
//! This is a test double, not a drain algorithm: it has no opinion on
//! servicing cadence or timeouts. Replies to `EXPECT_REPLY` transfers come
//! from a scripted reply queue.

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;

use geyser_core::packet::TransferFlags;
use geyser_host::context::DsiHost;

/// Services a [`DsiHost`] queue in FIFO order.
pub struct FifoEngine {
    host: Arc<DsiHost>,
    replies: Mutex<VecDeque<Vec<u8>>>,
    completed: Mutex<Vec<[u8; 4]>>,
}

impl FifoEngine {
    /// An engine over the given controller context.
    #[must_use]
    pub fn new(host: Arc<DsiHost>) -> Self {
        Self {
            host,
            replies: Mutex::new(VecDeque::new()),
            completed: Mutex::new(Vec::new()),
        }
    }

    /// Scripts the reply payload for the next `EXPECT_REPLY` transfer.
    pub fn push_reply(&self, payload: Vec<u8>) {
        lock(&self.replies).push_back(payload);
    }

    /// Services the oldest pending transfer, if any. Returns whether one
    /// was serviced.
    pub fn service_one(&self) -> bool {
        let Some(transfer) = self.host.dequeue() else {
            return false;
        };
        // Queue guard is released; progress and completion happen outside
        // any queue-wide critical section.
        let size = u16::try_from(transfer.packet().size()).unwrap_or(u16::MAX);
        transfer.record_tx(size);

        let mut result = Ok(());
        if transfer.flags().contains(TransferFlags::EXPECT_REPLY) {
            let reply = lock(&self.replies).pop_front().unwrap_or_default();
            result = transfer.record_rx(&reply);
        }

        lock(&self.completed).push(transfer.packet().header());
        let fired = transfer.complete(result);
        debug_assert!(fired, "a queued transfer must not be pre-completed");
        true
    }

    /// Services until the queue is empty; returns how many were serviced.
    pub fn service_all(&self) -> usize {
        let mut serviced = 0;
        while self.service_one() {
            serviced += 1;
        }
        serviced
    }

    /// Headers of completed transfers, in completion order.
    #[must_use]
    pub fn completed(&self) -> Vec<[u8; 4]> {
        lock(&self.completed).clone()
    }
}

impl fmt::Debug for FifoEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FifoEngine")
            .field("host", &self.host)
            .field("completed", &lock(&self.completed).len())
            .finish_non_exhaustive()
    }
}

/// A background service loop for blocking-wait scenarios.
///
/// Polls the queue until dropped or [`stop`](Self::stop)ped.
pub struct EngineThread {
    engine: Arc<FifoEngine>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl EngineThread {
    /// Spawns a service loop over the given controller context.
    #[must_use]
    pub fn spawn(host: Arc<DsiHost>) -> Self {
        let engine = Arc::new(FifoEngine::new(host));
        let stop = Arc::new(AtomicBool::new(false));
        let handle = {
            let engine = Arc::clone(&engine);
            let stop = Arc::clone(&stop);
            std::thread::spawn(move || {
                while !stop.load(Ordering::Relaxed) {
                    if !engine.service_one() {
                        std::thread::sleep(Duration::from_millis(1));
                    }
                }
            })
        };
        Self {
            engine,
            stop,
            handle: Some(handle),
        }
    }

    /// The engine being driven.
    #[must_use]
    pub fn engine(&self) -> &Arc<FifoEngine> {
        &self.engine
    }

    /// Stops the loop and joins the thread.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("engine service thread panicked");
            }
        }
    }
}

impl Drop for EngineThread {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl fmt::Debug for EngineThread {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineThread")
            .field("engine", &self.engine)
            .field("stopped", &self.stop.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
