// Copyright 2026 the Geyser Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Panel/bridge device descriptor and resource set.

use alloc::boxed::Box;
use alloc::sync::Arc;

use crate::irq::{IrqError, TeBinding, TePulse};
use crate::link::{ModeFlags, PixelFormat};

/// Link parameters a panel device advertises.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PanelInfo {
    /// Number of data lanes the panel uses.
    pub lanes: u8,
    /// Pixel format on the link.
    pub format: PixelFormat,
    /// Requested operating mode.
    pub mode: ModeFlags,
}

/// A panel or bridge device registering against the host.
///
/// Besides its advertised [`PanelInfo`], a device owns a resource set that
/// may contain a line named `"te"`. Command-mode attaches try to claim it;
/// many command-mode panels simply do not route one, which is why absence
/// is `Ok(None)` and not an error.
pub trait PanelDevice {
    /// The device's advertised link parameters.
    fn info(&self) -> PanelInfo;

    /// Claims the optional `"te"` line from this device's resource set and
    /// registers `handler` as a threaded rising-edge handler, initially
    /// disabled.
    ///
    /// # Errors
    ///
    /// Propagates [`IrqError`] for anything other than a missing line; a
    /// failed claim must leave the line unclaimed.
    fn claim_te(
        &self,
        handler: Arc<dyn TePulse>,
    ) -> Result<Option<Box<dyn TeBinding>>, IrqError>;
}
