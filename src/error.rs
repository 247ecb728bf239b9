// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Initialization failure conditions for NamedMutex.

use std::io;

use thiserror::Error;

/// Why `NamedMutex::init` failed.
///
/// Each variant maps to one stage of resource acquisition. The OS-level
/// variants carry the underlying `io::Error` so callers can inspect the
/// errno that stopped initialization. `lock`/`unlock` never produce these:
/// on an uninitialized mutex they degrade to no-ops instead.
#[derive(Debug, Error)]
pub enum InitError {
    /// The mutex name was empty (or not representable as a C string).
    #[error("invalid mutex name")]
    InvalidName,

    /// The shared-memory object or named semaphore could not be
    /// created or opened.
    #[error("failed to open shared memory object or named semaphore")]
    ResourceOpenFailed(#[source] io::Error),

    /// The shared-memory object could not be resized to hold the
    /// semaphore (shared mode only).
    #[error("failed to resize shared memory")]
    ResourceResizeFailed(#[source] io::Error),

    /// The shared-memory object could not be mapped into the address
    /// space (shared mode only).
    #[error("failed to map shared memory")]
    MappingFailed(#[source] io::Error),

    /// The in-place process-shared semaphore could not be initialized
    /// (shared mode only).
    #[error("failed to initialize semaphore")]
    InitFailed(#[source] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn os_variants_expose_source() {
        let e = InitError::ResourceOpenFailed(io::Error::from_raw_os_error(libc::EACCES));
        assert!(e.source().is_some());
    }

    #[test]
    fn invalid_name_has_no_source() {
        assert!(InitError::InvalidName.source().is_none());
    }
}
