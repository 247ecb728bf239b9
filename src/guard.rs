// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// RAII guard that holds a NamedMutex for a lexical scope.

use crate::NamedMutex;

/// RAII guard: the mutex is locked on construction and unlocked on drop,
/// so the critical section cannot leak the lock on early return or panic.
///
/// Obtained via [`NamedMutex::guard`], which refuses to hand out a guard
/// for an unusable mutex — a guard always represents real exclusion.
pub struct LockGuard<'a> {
    mutex: &'a NamedMutex,
}

impl<'a> LockGuard<'a> {
    pub(crate) fn new(mutex: &'a NamedMutex) -> Self {
        mutex.lock();
        Self { mutex }
    }
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        self.mutex.unlock();
    }
}
