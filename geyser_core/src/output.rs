// Copyright 2026 the Geyser Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Opaque identifier newtypes.
//!
//! The composition pipeline assigns output and CRTC identifiers; core code
//! passes them through without interpreting the value. [`AdapterToken`] goes
//! the other way: the platform adapter supplies it once at controller
//! construction so log lines and diagnostics can name the owning adapter
//! without the controller knowing its concrete type.

use core::fmt;

/// Identifies an output node registered with the composition pipeline.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct OutputId(pub u32);

impl fmt::Debug for OutputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OutputId({})", self.0)
    }
}

/// Identifies a CRTC inside the composition pipeline.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct CrtcId(pub u32);

impl fmt::Debug for CrtcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CrtcId({})", self.0)
    }
}

/// Opaque back-reference token identifying the platform adapter that owns a
/// host controller.
///
/// Set once at controller construction and never interpreted by core code.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AdapterToken(pub u64);

impl fmt::Debug for AdapterToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AdapterToken({:#x})", self.0)
    }
}

/// Display class used to look up the CRTC an output should drive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DisplayClass {
    /// Internal LCD/DSI path.
    Lcd,
    /// External HDMI path.
    Hdmi,
}
