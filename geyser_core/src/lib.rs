// Copyright 2026 the Geyser Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types and contracts for DSI host attachment and TE synchronization.
//!
//! `geyser_core` provides the vocabulary shared between a MIPI DSI host
//! controller and the composition pipeline it feeds: link configuration,
//! operational state flags, packet/transfer value types, and the traits that
//! mark the seams to the pipeline framework and the platform interrupt
//! layer. It is `no_std` compatible (with `alloc`).
//!
//! # Architecture
//!
//! The crate is organized around the attach/detach handshake that wires a
//! panel device to a running pipeline, and the TE pulse path that gates
//! frame pushes afterwards:
//!
//! ```text
//!   PanelDevice ──► attach ──► DisplayChain::connect_output()
//!                     │              │
//!                     │              ▼
//!                     │        with_config() ──► LinkConfig + on-demand flag
//!                     │
//!                     └──► claim_te() ──► TeBinding (disabled)
//!
//!   TE edge ──► TePulse::pulse() ──► [VIDOUT_AVAILABLE?] ──► FlipSink::frame_consumed()
//! ```
//!
//! **[`link`]** — Negotiated link parameters: lane count, pixel format, and
//! operating-mode flags, copied from the panel descriptor at attach time.
//!
//! **[`state`]** — [`LinkState`](state::LinkState) operational flags for one
//! host controller. Four orthogonal bits; reads must stay cheap enough for
//! interrupt context.
//!
//! **[`packet`]** — Immutable encoded packets and per-transfer flags/result
//! codes. Byte-level packet encoding is a collaborator concern, not ours.
//!
//! **[`chain`]** — The [`DisplayChain`](chain::DisplayChain) contract a
//! composition pipeline implements, including the configuration-mutation
//! lock and the [`FlipSink`](chain::FlipSink) flip-scheduling entry point.
//!
//! **[`irq`]** — Contracts for the platform interrupt layer: pulse handlers,
//! claimed TE line bindings, and the enable/disable hooks handed to the
//! transport engine.
//!
//! **[`panel`]** — The panel/bridge device descriptor and its resource set.
//!
//! **[`output`]** — Opaque identifier newtypes.
//!
//! **[`error`]** — Attach/bind error taxonomy.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod chain;
pub mod error;
pub mod irq;
pub mod link;
pub mod output;
pub mod packet;
pub mod panel;
pub mod state;
