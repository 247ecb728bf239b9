// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Normalizes caller-chosen mutex names into POSIX IPC names.
// Both the shm namespace (shm_open) and the named-semaphore namespace
// (sem_open) require a leading '/' and cap the name length on some
// platforms, so one helper serves both backends.

/// FNV-1a 64-bit hash, used to shorten over-long names deterministically.
pub fn fnv1a_64(data: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for &b in data {
        hash ^= b as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

fn to_hex(val: u64) -> [u8; 16] {
    const DIGITS: &[u8; 16] = b"0123456789abcdef";
    let mut buf = [0u8; 16];
    let mut v = val;
    for i in (0..16).rev() {
        buf[i] = DIGITS[(v & 0xf) as usize];
        v >>= 4;
    }
    buf
}

/// Maximum length for POSIX IPC names. Set to 0 to disable truncation.
///
/// On macOS both `PSHMNAMLEN` and `PSEMNAMLEN` are 31, so one limit covers
/// the shm and semaphore namespaces. On Linux the limit is NAME_MAX (255),
/// far above any realistic mutex name.
#[cfg(target_os = "macos")]
pub const IPC_NAME_MAX: usize = 31;

#[cfg(not(target_os = "macos"))]
pub const IPC_NAME_MAX: usize = 0; // 0 = no truncation

/// Produce a POSIX IPC name (with leading '/') from a caller-chosen name.
///
/// When `IPC_NAME_MAX > 0`, names whose POSIX form would exceed the limit
/// are shortened to `/<prefix>_<16-hex-FNV-1a-hash>`, keeping a readable
/// prefix of the original for debuggability. The mapping is deterministic,
/// so two parties agreeing on a long name still rendezvous on the same
/// OS object.
pub fn make_posix_name(name: &str) -> String {
    let result = if name.starts_with('/') {
        name.to_string()
    } else {
        format!("/{name}")
    };

    if IPC_NAME_MAX == 0 || result.len() <= IPC_NAME_MAX {
        return result;
    }

    // 1 (underscore) + 16 (hex hash)
    const HASH_SUFFIX_LEN: usize = 1 + 16;
    let prefix_len = if IPC_NAME_MAX > HASH_SUFFIX_LEN + 1 {
        IPC_NAME_MAX - HASH_SUFFIX_LEN - 1 // -1 for leading '/'
    } else {
        0
    };

    let hash = fnv1a_64(result.as_bytes());
    let hex = to_hex(hash);

    let mut shortened = String::with_capacity(IPC_NAME_MAX);
    shortened.push('/');
    if prefix_len > 0 {
        let body = &result[1..];
        let take = prefix_len.min(body.len());
        shortened.push_str(&body[..take]);
    }
    shortened.push('_');
    shortened.push_str(std::str::from_utf8(&hex).unwrap());
    shortened
}
