// Copyright 2026 the Geyser Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scripted panel-device double.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use geyser_core::irq::{IrqError, TeBinding, TePulse};
use geyser_core::link::{ModeFlags, PixelFormat};
use geyser_core::panel::{PanelDevice, PanelInfo};

use crate::te::SimTeLine;

/// A [`PanelDevice`] with scripted link parameters and an optional TE line
/// in its resource set.
pub struct ScriptedPanel {
    info: PanelInfo,
    te: Option<Arc<SimTeLine>>,
    fail_next_claim: AtomicBool,
    claim_attempts: AtomicU64,
}

impl ScriptedPanel {
    /// A panel with the given parameters and no TE line.
    #[must_use]
    pub fn new(info: PanelInfo) -> Self {
        Self {
            info,
            te: None,
            fail_next_claim: AtomicBool::new(false),
            claim_attempts: AtomicU64::new(0),
        }
    }

    /// A 4-lane RGB888 command-mode panel, the common fixture.
    #[must_use]
    pub fn command_mode() -> Self {
        Self::new(PanelInfo {
            lanes: 4,
            format: PixelFormat::Rgb888,
            mode: ModeFlags::LPM,
        })
    }

    /// A 4-lane RGB888 video-mode panel.
    #[must_use]
    pub fn video_mode() -> Self {
        Self::new(PanelInfo {
            lanes: 4,
            format: PixelFormat::Rgb888,
            mode: ModeFlags::VIDEO | ModeFlags::VIDEO_BURST,
        })
    }

    /// Routes a TE line into this panel's resource set.
    #[must_use]
    pub fn with_te_line(mut self, line: Arc<SimTeLine>) -> Self {
        self.te = Some(line);
        self
    }

    /// Scripts the next claim to fail with [`IrqError::RequestFailed`].
    pub fn fail_next_claim(&self) {
        self.fail_next_claim.store(true, Ordering::SeqCst);
    }

    /// How many times the attach path tried to claim the TE line.
    #[must_use]
    pub fn claim_attempts(&self) -> u64 {
        self.claim_attempts.load(Ordering::Relaxed)
    }

    /// The routed TE line, if any.
    #[must_use]
    pub fn te_line(&self) -> Option<&Arc<SimTeLine>> {
        self.te.as_ref()
    }
}

impl PanelDevice for ScriptedPanel {
    fn info(&self) -> PanelInfo {
        self.info
    }

    fn claim_te(
        &self,
        handler: Arc<dyn TePulse>,
    ) -> Result<Option<Box<dyn TeBinding>>, IrqError> {
        self.claim_attempts.fetch_add(1, Ordering::Relaxed);
        if self.fail_next_claim.swap(false, Ordering::SeqCst) {
            return Err(IrqError::RequestFailed);
        }
        match &self.te {
            None => Ok(None),
            Some(line) => SimTeLine::claim(line, handler)
                .map(|binding| Some(Box::new(binding) as Box<dyn TeBinding>)),
        }
    }
}

impl fmt::Debug for ScriptedPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptedPanel")
            .field("info", &self.info)
            .field("has_te_line", &self.te.is_some())
            .field("claim_attempts", &self.claim_attempts())
            .finish_non_exhaustive()
    }
}
