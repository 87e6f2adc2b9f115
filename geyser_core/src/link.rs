// Copyright 2026 the Geyser Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Negotiated link parameters.
//!
//! A [`LinkConfig`] is copied from the panel descriptor into the host
//! controller exactly once per attach, under the pipeline's configuration
//! lock. The transport engine reads it afterwards; it never changes between
//! an attach and the matching detach.

use bitflags::bitflags;

bitflags! {
    /// Operating-mode flags requested by a panel device.
    ///
    /// [`VIDEO`](Self::VIDEO) is the mode decision: present, the panel
    /// streams continuously and needs no TE gating; absent, the panel is a
    /// command-mode device and the attach path will try to claim its TE
    /// line. The remaining flags refine behavior within the chosen mode.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct ModeFlags: u16 {
        /// Video (continuous streaming) mode.
        const VIDEO = 1 << 0;
        /// Burst transmission within video mode.
        const VIDEO_BURST = 1 << 1;
        /// Use sync pulses rather than sync events in video mode.
        const VIDEO_SYNC_PULSE = 1 << 2;
        /// Transmit commands in low-power mode.
        const LPM = 1 << 3;
        /// Suppress the end-of-transmission packet.
        const NO_EOT_PACKET = 1 << 4;
    }
}

impl ModeFlags {
    /// Returns `true` for command-mode devices (video streaming absent).
    #[inline]
    #[must_use]
    pub const fn is_command_mode(self) -> bool {
        !self.contains(Self::VIDEO)
    }
}

/// Pixel format on the DSI link.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 24-bit RGB, one byte per component.
    Rgb888,
    /// 18-bit RGB, loosely packed into three bytes per pixel.
    Rgb666,
    /// 18-bit RGB, tightly packed.
    Rgb666Packed,
    /// 16-bit RGB.
    Rgb565,
}

impl PixelFormat {
    /// Bits occupied by one pixel on the wire.
    #[must_use]
    pub const fn bits_per_pixel(self) -> u32 {
        match self {
            Self::Rgb888 | Self::Rgb666 => 24,
            Self::Rgb666Packed => 18,
            Self::Rgb565 => 16,
        }
    }
}

/// Link parameters negotiated at attach time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LinkConfig {
    /// Number of data lanes the panel uses.
    pub lanes: u8,
    /// Pixel format on the link.
    pub format: PixelFormat,
    /// Operating-mode flags.
    pub mode: ModeFlags,
}

#[cfg(test)]
mod tests {
    use super::{ModeFlags, PixelFormat};

    #[test]
    fn command_mode_is_absence_of_video() {
        assert!(ModeFlags::empty().is_command_mode());
        assert!(ModeFlags::LPM.is_command_mode());
        assert!(!ModeFlags::VIDEO.is_command_mode());
        assert!(!(ModeFlags::VIDEO | ModeFlags::VIDEO_BURST).is_command_mode());
    }

    #[test]
    fn wire_widths() {
        assert_eq!(PixelFormat::Rgb888.bits_per_pixel(), 24);
        assert_eq!(PixelFormat::Rgb666.bits_per_pixel(), 24);
        assert_eq!(PixelFormat::Rgb666Packed.bits_per_pixel(), 18);
        assert_eq!(PixelFormat::Rgb565.bits_per_pixel(), 16);
    }
}
