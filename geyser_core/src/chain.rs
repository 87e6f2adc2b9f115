// Copyright 2026 the Geyser Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Composition-pipeline contract.
//!
//! The pipeline framework owns output topology, CRTCs, hotplug polling, and
//! frame scheduling. This module defines the slice of that surface the
//! attachment layer consumes, as traits a pipeline (or a test double)
//! implements:
//!
//! - [`DisplayChain`] — output-node lifecycle, CRTC lookup, the
//!   configuration-mutation lock, and hotplug notification.
//! - [`ScanoutConfig`] — the view of pipeline configuration that is only
//!   reachable inside [`DisplayChain::with_config`].
//! - [`FlipSink`] — the CRTC-level flip-scheduling entry point. The host
//!   controller holds one of these as an explicit capability handle while a
//!   panel is attached, so the TE pulse path never has to walk pipeline
//!   topology.
//!
//! Decoupling the low-level edge signal from the pipeline's own flip gate
//! keeps the pipeline's scheduler agnostic of display-class-specific sync
//! sources; any future display class can plug a different signal into the
//! same entry point.

use alloc::sync::Arc;

use crate::output::{CrtcId, DisplayClass, OutputId};

/// CRTC-level flip-scheduling entry point.
///
/// Implementations unblock the next page flip for their CRTC. Called from
/// threaded interrupt context, so implementations must not block for
/// unbounded time.
pub trait FlipSink: Send + Sync {
    /// The panel has consumed the previous frame; it is safe to flip.
    fn frame_consumed(&self);
}

/// Pipeline configuration reachable only under the configuration-mutation
/// lock.
pub trait ScanoutConfig {
    /// Marks a CRTC as scanning out on demand ("i80" style) rather than
    /// continuously.
    fn set_on_demand(&mut self, crtc: CrtcId, on_demand: bool);
}

/// The composition-pipeline surface consumed by the attachment layer.
///
/// All methods take `&self`; implementations are expected to synchronize
/// internally. [`with_config`](Self::with_config) is the
/// configuration-mutation lock: the closure runs with the lock held, and
/// anything written inside it is visible to any later reader that takes the
/// same lock.
pub trait DisplayChain {
    /// Registers a new output node for the given display class.
    ///
    /// # Errors
    ///
    /// [`ChainError::OutputLimit`] when the pipeline cannot take another
    /// output.
    fn create_output(&self, class: DisplayClass) -> Result<OutputId, ChainError>;

    /// Removes an output node. Unknown ids are ignored.
    fn remove_output(&self, output: OutputId);

    /// Connects an output node into the active display chain (the
    /// bridge-attach primitive). Structural wiring; failure is fatal to an
    /// attach in progress.
    ///
    /// # Errors
    ///
    /// [`ChainError::UnknownOutput`] for an id this chain never created,
    /// [`ChainError::ConnectRejected`] when the chain refuses the wiring.
    fn connect_output(&self, output: OutputId) -> Result<(), ChainError>;

    /// Looks up the CRTC driving the given display class, if any.
    fn crtc_by_class(&self, class: DisplayClass) -> Option<CrtcId>;

    /// Returns the flip-scheduling entry point for a CRTC previously
    /// returned by [`crtc_by_class`](Self::crtc_by_class).
    fn flip_sink(&self, crtc: CrtcId) -> Arc<dyn FlipSink>;

    /// Runs `f` with the configuration-mutation lock held.
    fn with_config<R>(&self, f: impl FnOnce(&mut dyn ScanoutConfig) -> R) -> R;

    /// Whether hotplug polling is currently enabled.
    fn poll_enabled(&self) -> bool;

    /// Emits a topology-changed notification to hotplug consumers.
    fn notify_hotplug(&self);
}

/// Failures reported by a [`DisplayChain`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ChainError {
    /// The pipeline cannot register another output node.
    #[error("output node limit reached")]
    OutputLimit,
    /// The output id was never created by this chain.
    #[error("unknown output node {0:?}")]
    UnknownOutput(OutputId),
    /// The chain refused to wire the output in.
    #[error("display chain rejected output {0:?}")]
    ConnectRejected(OutputId),
    /// No CRTC exists for the requested display class.
    #[error("no CRTC for display class {0:?}")]
    NoCrtc(DisplayClass),
}
