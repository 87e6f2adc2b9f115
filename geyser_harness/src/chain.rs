// Copyright 2026 the Geyser Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording display-chain double.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use geyser_core::chain::{ChainError, DisplayChain, FlipSink, ScanoutConfig};
use geyser_core::output::{CrtcId, DisplayClass, OutputId};

/// Flip sink that counts `frame_consumed` calls.
#[derive(Debug, Default)]
pub struct CountingFlipSink {
    count: AtomicU64,
}

impl CountingFlipSink {
    /// Number of flip-unblock events forwarded to this sink.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}

impl FlipSink for CountingFlipSink {
    fn frame_consumed(&self) {
        self.count.fetch_add(1, Ordering::Relaxed);
    }
}

#[derive(Default)]
struct ChainInner {
    next_output: u32,
    next_crtc: u32,
    outputs: Vec<OutputId>,
    connected: Vec<OutputId>,
    crtcs: Vec<(DisplayClass, CrtcId)>,
    on_demand: HashMap<CrtcId, bool>,
    sinks: HashMap<CrtcId, Arc<CountingFlipSink>>,
    reject_next_connect: bool,
}

impl ScanoutConfig for ChainInner {
    fn set_on_demand(&mut self, crtc: CrtcId, on_demand: bool) {
        self.on_demand.insert(crtc, on_demand);
    }
}

/// A [`DisplayChain`] double that records everything the protocol does to
/// it.
pub struct RecordingChain {
    inner: Mutex<ChainInner>,
    poll_enabled: AtomicBool,
    hotplug_events: AtomicU64,
    config_entries: AtomicU64,
}

impl RecordingChain {
    /// An empty chain: no CRTCs, polling disabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(ChainInner::default()),
            poll_enabled: AtomicBool::new(false),
            hotplug_events: AtomicU64::new(0),
            config_entries: AtomicU64::new(0),
        }
    }

    /// A chain with a single LCD CRTC, the common fixture.
    #[must_use]
    pub fn with_lcd_crtc() -> (Self, CrtcId) {
        let chain = Self::new();
        let crtc = chain.add_crtc(DisplayClass::Lcd);
        (chain, crtc)
    }

    /// Registers a CRTC for `class` and creates its counting flip sink.
    pub fn add_crtc(&self, class: DisplayClass) -> CrtcId {
        let mut inner = self.lock();
        let crtc = CrtcId(inner.next_crtc);
        inner.next_crtc += 1;
        inner.crtcs.push((class, crtc));
        inner.sinks.insert(crtc, Arc::new(CountingFlipSink::default()));
        inner.on_demand.insert(crtc, false);
        crtc
    }

    /// Turns hotplug polling on or off.
    pub fn set_poll_enabled(&self, enabled: bool) {
        self.poll_enabled.store(enabled, Ordering::Relaxed);
    }

    /// Makes the next [`DisplayChain::connect_output`] fail.
    pub fn reject_next_connect(&self) {
        self.lock().reject_next_connect = true;
    }

    /// Number of topology-changed notifications observed.
    #[must_use]
    pub fn hotplug_events(&self) -> u64 {
        self.hotplug_events.load(Ordering::Relaxed)
    }

    /// Number of times the configuration lock was entered.
    #[must_use]
    pub fn config_entries(&self) -> u64 {
        self.config_entries.load(Ordering::Relaxed)
    }

    /// The recorded on-demand flag for a CRTC.
    #[must_use]
    pub fn on_demand(&self, crtc: CrtcId) -> Option<bool> {
        self.lock().on_demand.get(&crtc).copied()
    }

    /// Output ids connected into the display chain, in order.
    #[must_use]
    pub fn connected_outputs(&self) -> Vec<OutputId> {
        self.lock().connected.clone()
    }

    /// The counting sink behind a CRTC's flip-scheduling entry point.
    #[must_use]
    pub fn sink(&self, crtc: CrtcId) -> Arc<CountingFlipSink> {
        Arc::clone(
            self.lock()
                .sinks
                .get(&crtc)
                .expect("sink queried for a CrtcId this chain never created"),
        )
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ChainInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for RecordingChain {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayChain for RecordingChain {
    fn create_output(&self, _class: DisplayClass) -> Result<OutputId, ChainError> {
        let mut inner = self.lock();
        let output = OutputId(inner.next_output);
        inner.next_output += 1;
        inner.outputs.push(output);
        Ok(output)
    }

    fn remove_output(&self, output: OutputId) {
        let mut inner = self.lock();
        inner.outputs.retain(|o| *o != output);
        inner.connected.retain(|o| *o != output);
    }

    fn connect_output(&self, output: OutputId) -> Result<(), ChainError> {
        let mut inner = self.lock();
        if !inner.outputs.contains(&output) {
            return Err(ChainError::UnknownOutput(output));
        }
        if std::mem::take(&mut inner.reject_next_connect) {
            return Err(ChainError::ConnectRejected(output));
        }
        inner.connected.push(output);
        Ok(())
    }

    fn crtc_by_class(&self, class: DisplayClass) -> Option<CrtcId> {
        self.lock()
            .crtcs
            .iter()
            .find(|(c, _)| *c == class)
            .map(|(_, crtc)| *crtc)
    }

    fn flip_sink(&self, crtc: CrtcId) -> Arc<dyn FlipSink> {
        self.sink(crtc)
    }

    fn with_config<R>(&self, f: impl FnOnce(&mut dyn ScanoutConfig) -> R) -> R {
        self.config_entries.fetch_add(1, Ordering::Relaxed);
        let mut inner = self.lock();
        f(&mut *inner)
    }

    fn poll_enabled(&self) -> bool {
        self.poll_enabled.load(Ordering::Relaxed)
    }

    fn notify_hotplug(&self) {
        self.hotplug_events.fetch_add(1, Ordering::Relaxed);
    }
}

impl fmt::Debug for RecordingChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        f.debug_struct("RecordingChain")
            .field("outputs", &inner.outputs)
            .field("connected", &inner.connected)
            .field("crtcs", &inner.crtcs)
            .field("poll_enabled", &self.poll_enabled.load(Ordering::Relaxed))
            .field("hotplug_events", &self.hotplug_events())
            .finish_non_exhaustive()
    }
}
