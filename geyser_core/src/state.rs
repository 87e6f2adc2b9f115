// Copyright 2026 the Geyser Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Operational state flags for one host controller.
//!
//! [`LinkState`] is a set of four orthogonal flags. They are *not* a
//! progression: any combination is legal, and each flag has a single owner.
//!
//! - [`ENABLED`](LinkState::ENABLED) and
//!   [`INITIALIZED`](LinkState::INITIALIZED) are set and cleared by the
//!   controller's enable/init path.
//! - [`CMD_LPM`](LinkState::CMD_LPM) is toggled by the transport engine
//!   around low-power command transfers.
//! - [`VIDOUT_AVAILABLE`](LinkState::VIDOUT_AVAILABLE) is set while video
//!   output is actively driving the panel. It gates whether TE pulses are
//!   forwarded to the pipeline; a pulse arriving while it is clear is
//!   acknowledged and dropped.
//!
//! The attach/detach protocol reads these flags but never mutates them.
//!
//! The set fits in a `u8` so a controller can publish it through a single
//! atomic, keeping reads cheap enough for interrupt context.

use bitflags::bitflags;

bitflags! {
    /// Orthogonal operational flags for a host controller.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct LinkState: u8 {
        /// The controller's clocks and PHY are up.
        const ENABLED = 1 << 0;
        /// The link has completed its initialization handshake.
        const INITIALIZED = 1 << 1;
        /// Command transfers currently run in low-power mode.
        const CMD_LPM = 1 << 2;
        /// Video output is actively driving the panel.
        const VIDOUT_AVAILABLE = 1 << 3;
    }
}

impl LinkState {
    /// Returns `true` when TE pulses should be forwarded to the pipeline.
    #[inline]
    #[must_use]
    pub const fn forwards_te(self) -> bool {
        self.contains(Self::VIDOUT_AVAILABLE)
    }
}

#[cfg(test)]
mod tests {
    use super::LinkState;

    #[test]
    fn flags_are_orthogonal() {
        let mut state = LinkState::empty();
        state.insert(LinkState::ENABLED);
        state.insert(LinkState::CMD_LPM);
        assert!(state.contains(LinkState::ENABLED));
        assert!(state.contains(LinkState::CMD_LPM));
        assert!(!state.contains(LinkState::INITIALIZED));
        assert!(!state.contains(LinkState::VIDOUT_AVAILABLE));

        state.remove(LinkState::ENABLED);
        assert!(
            state.contains(LinkState::CMD_LPM),
            "clearing one flag must not disturb the others"
        );
    }

    #[test]
    fn all_four_flags_fit_in_u8() {
        assert_eq!(LinkState::all().bits(), 0b1111);
    }

    #[test]
    fn forwards_te_tracks_vidout_only() {
        assert!(!LinkState::empty().forwards_te());
        assert!(!(LinkState::ENABLED | LinkState::INITIALIZED).forwards_te());
        assert!(LinkState::VIDOUT_AVAILABLE.forwards_te());
        assert!((LinkState::ENABLED | LinkState::VIDOUT_AVAILABLE).forwards_te());
    }
}
