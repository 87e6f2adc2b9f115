// Copyright 2026 the Geyser Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Poison-tolerant lock acquisition.
//!
//! A panicking pipeline or engine thread must not wedge attach/detach or
//! strand a waiter on a transfer completion, so every guard in this crate
//! recovers the inner value from a poisoned lock instead of propagating the
//! panic.

use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn read<T>(rwlock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    rwlock.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write<T>(rwlock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    rwlock.write().unwrap_or_else(PoisonError::into_inner)
}
