// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// The public named-mutex type. Mode dispatch and the degraded no-op
// behavior live here; the OS-facing work is in platform::posix.

use crate::error::InitError;
use crate::guard::LockGuard;
use crate::name;
use crate::platform::{NamedSemaphore, PlatformSem, ShmSemaphore};

/// A named, dual-mode mutual-exclusion primitive.
///
/// Instances in the same or different processes that agree on a name and a
/// mode rendezvous on the same underlying OS object:
///
/// * `shared == true` — a process-shared semaphore placed in a shared-memory
///   object (`shm_open` + `mmap` + `sem_init` with `pshared`).
/// * `shared == false` — a POSIX named semaphore (`sem_open`).
///
/// The two modes use unrelated OS namespaces; mixing modes under one name
/// gives two independent locks, not mutual exclusion between them.
///
/// Construction performs no OS calls. [`init`](Self::init) acquires the
/// backing resource and must succeed before [`lock`](Self::lock) /
/// [`unlock`](Self::unlock) have any effect — on an uninitialized mutex
/// both degrade to silent no-ops, so callers must check `init`'s result
/// (or [`is_usable`](Self::is_usable)) before relying on exclusion.
///
/// Dropping the mutex releases everything it acquired: the in-place
/// semaphore is destroyed, the mapping or descriptor is released, and the
/// name is unlinked from the OS namespace. The first instance to drop wins
/// the unlink; instances still holding the object keep working on their
/// live handles, and the next `init` under that name creates from scratch.
pub struct NamedMutex {
    name: String,
    shared: bool,
    sem: Option<PlatformSem>,
}

impl NamedMutex {
    /// Capture `name` and `shared`. No OS calls; an empty name is accepted
    /// here and rejected by `init`.
    pub fn new(name: impl Into<String>, shared: bool) -> Self {
        Self {
            name: name.into(),
            shared,
            sem: None,
        }
    }

    /// Acquire the backing OS resource.
    ///
    /// On failure the mutex stays unusable and every partially-created
    /// resource from this attempt has been released, so calling `init`
    /// again retries from scratch. Calling `init` on an already-initialized
    /// mutex is a no-op: the instance owns exactly one backing resource for
    /// its lifetime.
    pub fn init(&mut self) -> Result<(), InitError> {
        if self.sem.is_some() {
            return Ok(());
        }
        if self.name.is_empty() {
            return Err(InitError::InvalidName);
        }

        let posix_name = name::make_posix_name(&self.name);
        let sem = if self.shared {
            PlatformSem::Shared(ShmSemaphore::create(&posix_name)?)
        } else {
            PlatformSem::Named(NamedSemaphore::create(&posix_name)?)
        };
        self.sem = Some(sem);
        Ok(())
    }

    /// Block until exclusive access is granted.
    ///
    /// On an uninitialized mutex this returns immediately without blocking
    /// — "lock unavailable", not "lock acquired". Use
    /// [`is_usable`](Self::is_usable) to tell the cases apart.
    pub fn lock(&self) {
        if let Some(sem) = &self.sem {
            let _ = sem.wait();
        }
    }

    /// Release exclusive access, waking one blocked waiter if any.
    ///
    /// No-op on an uninitialized mutex. Unlocking without a preceding
    /// `lock` is a caller error the primitive does not detect.
    pub fn unlock(&self) {
        if let Some(sem) = &self.sem {
            let _ = sem.post();
        }
    }

    /// Whether `lock`/`unlock` operate on a live OS primitive.
    pub fn is_usable(&self) -> bool {
        self.sem.is_some()
    }

    /// Lock and return an RAII guard that unlocks on drop, or `None` if the
    /// mutex was never successfully initialized.
    pub fn guard(&self) -> Option<LockGuard<'_>> {
        if !self.is_usable() {
            return None;
        }
        Some(LockGuard::new(self))
    }

    /// The caller-chosen name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this mutex uses the shared-memory backing.
    pub fn is_shared(&self) -> bool {
        self.shared
    }

    /// Remove the named OS object backing `name` in the given mode, without
    /// needing an open handle. Best-effort; removing a name that does not
    /// exist is not an error.
    pub fn clear_storage(name: &str, shared: bool) {
        if name.is_empty() {
            return;
        }
        let posix_name = name::make_posix_name(name);
        if shared {
            ShmSemaphore::unlink_by_name(&posix_name);
        } else {
            NamedSemaphore::unlink_by_name(&posix_name);
        }
    }
}
