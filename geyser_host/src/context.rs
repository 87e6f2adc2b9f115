// Copyright 2026 the Geyser Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The shared per-controller context.
//!
//! One [`DsiHost`] exists per physical host controller, created at device
//! discovery and destroyed at device removal; it outlives any individual
//! panel attach/detach cycle. Three actors share it:
//!
//! - the attach/detach path writes the negotiated link parameters and the
//!   flip target,
//! - the TE pulse path reads the state flags and the flip target,
//! - the transport engine reads the link parameters and services the
//!   transfer queue.
//!
//! The state flags live in a single atomic so the pulse path never takes a
//! lock to read them. The transfer queue has its own guard, distinct from
//! the pipeline's configuration lock, so a slow configuration change cannot
//! stall in-flight packet completions. The queue guard is never held across
//! a blocking wait on a transfer.

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use geyser_core::chain::FlipSink;
use geyser_core::link::LinkConfig;
use geyser_core::output::AdapterToken;
use geyser_core::state::LinkState;

use crate::sync::{lock, read, write};
use crate::transfer::Transfer;

/// Shared state for one physical host controller.
pub struct DsiHost {
    token: AdapterToken,
    state: AtomicU8,
    link: RwLock<Option<LinkConfig>>,
    queue: Mutex<VecDeque<Arc<Transfer>>>,
    flip: Mutex<Option<Arc<dyn FlipSink>>>,
}

impl DsiHost {
    /// Creates a controller context tagged with its adapter's token.
    #[must_use]
    pub fn new(token: AdapterToken) -> Self {
        Self {
            token,
            state: AtomicU8::new(LinkState::empty().bits()),
            link: RwLock::new(None),
            queue: Mutex::new(VecDeque::new()),
            flip: Mutex::new(None),
        }
    }

    /// The owning adapter's token, as supplied at construction.
    #[must_use]
    pub fn token(&self) -> AdapterToken {
        self.token
    }

    // -- operational state -------------------------------------------------

    /// Current state flags. Lock-free; safe from interrupt context.
    #[must_use]
    pub fn state(&self) -> LinkState {
        LinkState::from_bits_truncate(self.state.load(Ordering::Acquire))
    }

    /// Sets the given flags, leaving the others untouched.
    ///
    /// Owned by the controller's enable/init path and the transport engine;
    /// the attach/detach protocol never calls this.
    pub fn insert_state(&self, flags: LinkState) {
        self.state.fetch_or(flags.bits(), Ordering::AcqRel);
    }

    /// Clears the given flags, leaving the others untouched.
    pub fn remove_state(&self, flags: LinkState) {
        self.state.fetch_and(!flags.bits(), Ordering::AcqRel);
    }

    // -- negotiated link parameters ----------------------------------------

    /// Stores the parameters negotiated with the attached device.
    ///
    /// Called by the attach protocol, inside the display chain's
    /// configuration lock, exactly once per attach. The parameters then
    /// stay stable until the next attach.
    pub fn set_link_config(&self, config: LinkConfig) {
        *write(&self.link) = Some(config);
    }

    /// The negotiated parameters, or `None` before the first attach.
    #[must_use]
    pub fn link_config(&self) -> Option<LinkConfig> {
        *read(&self.link)
    }

    // -- transfer queue ----------------------------------------------------

    /// Appends a transfer to the queue tail and returns immediately.
    ///
    /// The caller typically keeps its own `Arc` and blocks on
    /// [`Transfer::wait`] afterwards — never while the queue guard is held.
    pub fn enqueue(&self, transfer: Arc<Transfer>) {
        lock(&self.queue).push_back(transfer);
    }

    /// Pops the oldest pending transfer. Engine-only.
    ///
    /// The guard is released before this returns, so the engine completes
    /// records without any queue lock held — a completion can therefore
    /// never fire while an enqueuing caller holds the guard.
    #[must_use]
    pub fn dequeue(&self) -> Option<Arc<Transfer>> {
        lock(&self.queue).pop_front()
    }

    /// Number of transfers currently queued.
    #[must_use]
    pub fn pending(&self) -> usize {
        lock(&self.queue).len()
    }

    // -- flip-scheduling target --------------------------------------------

    /// Installs the flip-scheduling target for the currently attached
    /// device. Attach-path only.
    pub fn set_flip_target(&self, sink: Arc<dyn FlipSink>) {
        *lock(&self.flip) = Some(sink);
    }

    /// Clears the flip-scheduling target. Detach/unbind-path only.
    pub fn clear_flip_target(&self) {
        *lock(&self.flip) = None;
    }

    /// The current flip-scheduling target, if a device is attached.
    #[must_use]
    pub fn flip_target(&self) -> Option<Arc<dyn FlipSink>> {
        lock(&self.flip).clone()
    }
}

impl fmt::Debug for DsiHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DsiHost")
            .field("token", &self.token)
            .field("state", &self.state())
            .field("link", &self.link_config())
            .field("pending", &self.pending())
            .field("has_flip_target", &self.flip_target().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};

    use geyser_core::chain::FlipSink;
    use geyser_core::link::{LinkConfig, ModeFlags, PixelFormat};
    use geyser_core::output::AdapterToken;
    use geyser_core::packet::Packet;
    use geyser_core::state::LinkState;

    use super::DsiHost;
    use crate::transfer::Transfer;

    #[derive(Debug, Default)]
    struct CountingSink(AtomicU64);

    impl FlipSink for CountingSink {
        fn frame_consumed(&self) {
            self.0.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn state_flags_set_and_clear_independently() {
        let host = DsiHost::new(AdapterToken(1));
        assert_eq!(host.state(), LinkState::empty());

        host.insert_state(LinkState::ENABLED | LinkState::INITIALIZED);
        host.insert_state(LinkState::VIDOUT_AVAILABLE);
        host.remove_state(LinkState::ENABLED);

        assert_eq!(
            host.state(),
            LinkState::INITIALIZED | LinkState::VIDOUT_AVAILABLE
        );
    }

    #[test]
    fn queue_preserves_fifo_order() {
        let host = DsiHost::new(AdapterToken(2));
        for header0 in 1..=3_u8 {
            host.enqueue(Arc::new(Transfer::write(Packet::from_header([
                header0, 0, 0, 0,
            ]))));
        }
        assert_eq!(host.pending(), 3);

        for expected in 1..=3_u8 {
            let t = host.dequeue().expect("queued transfer");
            assert_eq!(t.packet().header()[0], expected);
        }
        assert!(host.dequeue().is_none());
    }

    #[test]
    fn link_config_round_trips() {
        let host = DsiHost::new(AdapterToken(3));
        assert!(host.link_config().is_none());

        let config = LinkConfig {
            lanes: 4,
            format: PixelFormat::Rgb888,
            mode: ModeFlags::LPM,
        };
        host.set_link_config(config);
        assert_eq!(host.link_config(), Some(config));
    }

    #[test]
    fn flip_target_install_and_clear() {
        let host = DsiHost::new(AdapterToken(4));
        assert!(host.flip_target().is_none());

        let sink = Arc::new(CountingSink::default());
        host.set_flip_target(sink.clone());
        host.flip_target().expect("installed sink").frame_consumed();
        assert_eq!(sink.0.load(Ordering::Relaxed), 1);

        host.clear_flip_target();
        assert!(host.flip_target().is_none());
    }
}
