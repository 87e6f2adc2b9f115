// Copyright 2026 the Geyser Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Encoded packets and per-transfer flags/result codes.
//!
//! A [`Packet`] is an already-encoded exchange unit: a fixed 4-byte header
//! plus an optional payload. Encoding rules (data types, ECC, checksums)
//! belong to the packet codec, not to this crate; we only carry the bytes.

use alloc::vec::Vec;

/// One immutable encoded packet: 4-byte header plus payload.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Packet {
    header: [u8; 4],
    payload: Vec<u8>,
}

impl Packet {
    /// Creates a packet from an encoded header and payload.
    #[must_use]
    pub const fn new(header: [u8; 4], payload: Vec<u8>) -> Self {
        Self { header, payload }
    }

    /// Creates a payload-less (short) packet.
    #[must_use]
    pub const fn from_header(header: [u8; 4]) -> Self {
        Self {
            header,
            payload: Vec::new(),
        }
    }

    /// The encoded 4-byte header.
    #[must_use]
    pub const fn header(&self) -> [u8; 4] {
        self.header
    }

    /// The payload bytes (empty for short packets).
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Total size on the wire in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.header.len() + self.payload.len()
    }
}

bitflags::bitflags! {
    /// Requested behavior for one transfer.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct TransferFlags: u16 {
        /// The peer is expected to send a reply payload.
        const EXPECT_REPLY = 1 << 0;
        /// Last transfer of a burst; the engine may drop the link to idle
        /// afterwards.
        const LAST_IN_BURST = 1 << 1;
        /// Exchange this packet in low-power mode.
        const USE_LPM = 1 << 2;
    }
}

/// Terminal failure codes for a transfer.
///
/// Only ever surfaced through a transfer record's result; transfer failures
/// never propagate across the attach/detach path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum TransferError {
    /// The link dropped before the exchange finished.
    #[error("link went down mid-transfer")]
    LinkDown,
    /// The engine gave up waiting on the peer.
    #[error("transfer timed out")]
    Timeout,
    /// The reply did not fit the caller's receive buffer.
    #[error("reply exceeded the receive buffer")]
    RxOverflow,
}

#[cfg(test)]
mod tests {
    use super::{Packet, TransferFlags};
    use alloc::vec;

    #[test]
    fn short_packet_has_no_payload() {
        let p = Packet::from_header([0x05, 0x11, 0x00, 0x24]);
        assert!(p.payload().is_empty());
        assert_eq!(p.size(), 4);
    }

    #[test]
    fn long_packet_size_includes_payload() {
        let p = Packet::new([0x39, 0x03, 0x00, 0x00], vec![0x2c, 0xff, 0x00]);
        assert_eq!(p.size(), 7);
        assert_eq!(p.payload(), &[0x2c, 0xff, 0x00]);
    }

    #[test]
    fn transfer_flags_compose() {
        let flags = TransferFlags::EXPECT_REPLY | TransferFlags::USE_LPM;
        assert!(flags.contains(TransferFlags::EXPECT_REPLY));
        assert!(!flags.contains(TransferFlags::LAST_IN_BURST));
    }
}
