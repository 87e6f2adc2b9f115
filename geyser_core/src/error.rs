// Copyright 2026 the Geyser Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Attach/bind error taxonomy.
//!
//! Every failure on the attach path is returned to the immediate caller;
//! nothing is silently swallowed except the explicitly idempotent no-op
//! cases (redundant TE enable/disable, detach of a device that never bound
//! TE). Transfer failures are a separate channel entirely — see
//! [`TransferError`](crate::packet::TransferError).

use crate::chain::ChainError;
use crate::irq::IrqError;

/// Why an attach was aborted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AttachError {
    /// The adapter has not been bound to a display chain yet.
    #[error("host adapter is not bound to a display chain")]
    NotBound,
    /// Structural wiring into the display chain failed.
    #[error(transparent)]
    Chain(#[from] ChainError),
    /// TE line acquisition failed (a missing line is not a failure).
    #[error("te interrupt setup failed: {0}")]
    Te(#[from] IrqError),
}

/// Why a composition bind failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    /// The adapter is already bound to a display chain.
    #[error("host adapter is already bound")]
    AlreadyBound,
    /// The chain could not register the output node.
    #[error(transparent)]
    Chain(#[from] ChainError),
}
