// Copyright 2026 the Geyser Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Platform interrupt-layer contracts.
//!
//! The platform resource layer turns a named edge-triggered input line into
//! a [`TeBinding`]: a claimed line with a registered threaded rising-edge
//! handler, initially disabled. The attachment layer owns the binding
//! between a successful command-mode attach and the matching detach; the
//! transport engine only ever sees the [`IrqHooks`] facade.

use alloc::boxed::Box;

/// Handler invoked once per rising edge on a claimed TE line.
pub trait TePulse: Send + Sync {
    /// A rising edge was observed.
    fn pulse(&self);
}

/// A claimed TE line with a registered handler.
///
/// Freshly claimed bindings are disabled: no pulse is delivered until
/// [`enable`](Self::enable) is called.
///
/// # Contract
///
/// `enable` and `disable` must be callable from any execution context and
/// must be idempotent — enabling an already-enabled line, or disabling an
/// already-disabled one, is a no-op, not an error.
pub trait TeBinding: Send + Sync {
    /// Re-arms the line so hardware pulses are delivered.
    fn enable(&self);

    /// Masks the line. Pulses while masked are dropped.
    fn disable(&self);

    /// Frees the handler registration and releases the line.
    ///
    /// After this returns the line can be claimed again and no pulse will
    /// ever reach the old handler.
    ///
    /// # Errors
    ///
    /// [`IrqError::ReleaseFailed`] when the platform could not cleanly free
    /// the registration. Callers log this and continue; release failures
    /// must never block device teardown.
    fn release(self: Box<Self>) -> Result<(), IrqError>;
}

/// TE enable/disable hooks exposed to the transport engine.
///
/// The engine calls these around command transfers that need TE gating.
/// Both are no-ops when no TE line is bound (video-mode panels, or
/// command-mode panels without a TE line), and both inherit the idempotence
/// contract of [`TeBinding`].
pub trait IrqHooks {
    /// Arms the TE interrupt, if one is bound.
    fn enable_te(&self);

    /// Masks the TE interrupt, if one is bound.
    fn disable_te(&self);
}

/// Failures from the platform interrupt layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum IrqError {
    /// The line is already claimed by another binding.
    #[error("te line is already claimed")]
    Busy,
    /// The platform rejected the interrupt registration.
    #[error("te interrupt request failed")]
    RequestFailed,
    /// The platform could not cleanly free the registration.
    #[error("te interrupt release failed")]
    ReleaseFailed,
}
