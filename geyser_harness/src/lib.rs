// Copyright 2026 the Geyser Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reusable test doubles and pacing utilities for the attachment protocol.
//!
//! Nothing here touches hardware. The doubles uphold the same contracts the
//! real collaborators would:
//!
//! - [`RecordingChain`] — a [`DisplayChain`](geyser_core::chain::DisplayChain)
//!   that records connects, hotplug notifications, and per-CRTC on-demand
//!   flags, and hands out counting flip sinks.
//! - [`SimTeLine`] / [`SimTeBinding`] — a claimable simulated TE line with
//!   idempotent arm/mask semantics.
//! - [`ScriptedPanel`] — a panel device with scripted link parameters and
//!   an optional TE line in its resource set.
//! - [`FifoEngine`] — a transport-engine double that services the queue in
//!   FIFO order and never completes a record while holding the queue guard.
//! - [`TePacer`] — a background thread firing a TE line at a fixed refresh
//!   interval, paced against the monotonic clock.

mod chain;
mod engine;
mod pacer;
mod panel;
mod te;

pub use chain::{CountingFlipSink, RecordingChain};
pub use engine::{EngineThread, FifoEngine};
pub use pacer::TePacer;
pub use panel::ScriptedPanel;
pub use te::{SimTeBinding, SimTeLine};
