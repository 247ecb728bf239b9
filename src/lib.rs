// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Named dual-mode mutex: a string-named mutual-exclusion primitive backed
// either by a process-shared semaphore in shared memory or by a POSIX named
// semaphore, selected at construction time.

pub mod name;

mod platform;

mod error;
pub use error::InitError;

mod mutex;
pub use mutex::NamedMutex;

mod guard;
pub use guard::LockGuard;
