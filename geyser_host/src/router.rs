// Copyright 2026 the Geyser Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! TE pulse routing into the pipeline's flip gate.
//!
//! The platform layer delivers one [`TePulse::pulse`] call per rising edge
//! on the panel's TE line. The router turns that into a
//! [`FlipSink::frame_consumed`](geyser_core::chain::FlipSink::frame_consumed)
//! call on the currently installed flip target — but only while
//! [`VIDOUT_AVAILABLE`](geyser_core::state::LinkState::VIDOUT_AVAILABLE) is
//! set. A pulse arriving before a CRTC is actually driving output would
//! unblock a flip spuriously, so it is acknowledged and dropped instead.

use std::sync::Arc;

use geyser_core::irq::TePulse;

use crate::context::DsiHost;

/// Forwards TE pulses to the current flip target, gated by controller
/// state.
#[derive(Clone, Debug)]
pub struct TeRouter {
    host: Arc<DsiHost>,
}

impl TeRouter {
    /// Creates a router over the given controller context.
    #[must_use]
    pub fn new(host: Arc<DsiHost>) -> Self {
        Self { host }
    }

    /// The controller context this router reads.
    #[must_use]
    pub fn host(&self) -> &Arc<DsiHost> {
        &self.host
    }
}

impl TePulse for TeRouter {
    fn pulse(&self) {
        // State is sampled at pulse time; an attach/detach racing on a
        // *different* device cannot invalidate what we read here.
        if !self.host.state().forwards_te() {
            return;
        }
        if let Some(sink) = self.host.flip_target() {
            sink.frame_consumed();
        }
    }
}
