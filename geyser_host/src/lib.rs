// Copyright 2026 the Geyser Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DSI host attachment state machine, transfer queue, and TE routing.
//!
//! This crate coordinates three independently scheduled actors over one
//! shared controller context:
//!
//! - the composition pipeline's bind/attach/detach call path,
//! - a threaded interrupt context delivering TE (tearing-effect) pulses,
//! - a transport engine draining the packet transfer queue.
//!
//! ```text
//!   bind/attach path          TE edge (irq thread)       transport engine
//!        │                          │                          │
//!        ▼                          ▼                          ▼
//!   SocAdapter ──owns──► DsiHost ◄──reads── TeRouter      enqueue/dequeue
//!        │                  │                  │          record/complete
//!        │                  │                  ▼
//!        └── DisplayChain   └─ flip target ► FlipSink::frame_consumed()
//! ```
//!
//! **[`context`]** — [`DsiHost`](context::DsiHost), the per-controller
//! shared state: operational flags, negotiated link parameters, the FIFO
//! transfer queue, and the current flip-scheduling target.
//!
//! **[`transfer`]** — [`Transfer`](transfer::Transfer) records with
//! one-shot completion signalling; the enqueue/wait/complete contract the
//! transport engine services.
//!
//! **[`router`]** — [`TeRouter`](router::TeRouter), forwarding rising-edge
//! pulses into the pipeline's flip gate when video output is live.
//!
//! **[`adapter`]** — [`SocAdapter`](adapter::SocAdapter), the per-SoC glue
//! implementing the bind/unbind and attach/detach protocols.

pub mod adapter;
pub mod context;
pub mod router;
pub mod transfer;

mod sync;
