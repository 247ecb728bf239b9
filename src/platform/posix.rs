// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// POSIX backends for the named mutex: a process-shared sem_t placed in a
// mapped shm object, and a POSIX named semaphore obtained via sem_open.

use std::ffi::CString;
use std::io;
use std::ptr;

use crate::error::InitError;

// Owner-only permission bits (S_IRWXU) for both namespaces.
const PERMS: libc::mode_t = 0o700;

fn to_c_name(posix_name: &str) -> Result<CString, InitError> {
    CString::new(posix_name.as_bytes()).map_err(|_| InitError::InvalidName)
}

/// The live backing behind an initialized `NamedMutex`.
///
/// The two variants live in unrelated OS namespaces: the same string used
/// once per variant names two different objects, with no mutual exclusion
/// between them.
pub enum PlatformSem {
    Shared(ShmSemaphore),
    Named(NamedSemaphore),
}

impl PlatformSem {
    /// Decrement the semaphore, blocking until it can be taken.
    pub fn wait(&self) -> io::Result<()> {
        match self {
            PlatformSem::Shared(s) => sem_wait_eintr(s.sem),
            PlatformSem::Named(s) => sem_wait_eintr(s.sem),
        }
    }

    /// Increment the semaphore, waking one blocked waiter if any.
    pub fn post(&self) -> io::Result<()> {
        match self {
            PlatformSem::Shared(s) => sem_post_checked(s.sem),
            PlatformSem::Named(s) => sem_post_checked(s.sem),
        }
    }
}

fn sem_wait_eintr(sem: *mut libc::sem_t) -> io::Result<()> {
    loop {
        let ret = unsafe { libc::sem_wait(sem) };
        if ret == 0 {
            return Ok(());
        }
        let err = io::Error::last_os_error();
        if err.raw_os_error() != Some(libc::EINTR) {
            return Err(err);
        }
    }
}

fn sem_post_checked(sem: *mut libc::sem_t) -> io::Result<()> {
    let ret = unsafe { libc::sem_post(sem) };
    if ret != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// ShmSemaphore — sem_t in a mapped shared-memory object (shared mode)
// ---------------------------------------------------------------------------

/// A process-shared `sem_t` living inside an shm object of exactly
/// `size_of::<sem_t>()` bytes, initialized with count 1.
///
/// Requires a platform where unnamed semaphores work across processes
/// (`sem_init` with `pshared = 1`); that is the assumed POSIX substrate.
pub struct ShmSemaphore {
    sem: *mut libc::sem_t,
    name: CString, // POSIX shm name (with leading '/')
}

// Safety: sem_t in shared memory is process-shared by design; sem_wait and
// sem_post are async-signal-safe and callable from any thread.
unsafe impl Send for ShmSemaphore {}
unsafe impl Sync for ShmSemaphore {}

impl ShmSemaphore {
    /// Create or attach to the shm object under `posix_name` and obtain the
    /// in-place semaphore.
    ///
    /// Exclusive create is attempted first so that only the creator sizes
    /// the object and runs `sem_init`; attaching to an already-initialized
    /// semaphore must not reset its count. Every failure path unwinds what
    /// this call created, so a failed attempt leaves no residue under the
    /// name and a retry starts from scratch.
    pub fn create(posix_name: &str) -> Result<Self, InitError> {
        let c_name = to_c_name(posix_name)?;
        let size = std::mem::size_of::<libc::sem_t>();

        let (fd, created) = {
            let f = unsafe {
                libc::shm_open(
                    c_name.as_ptr(),
                    libc::O_RDWR | libc::O_CREAT | libc::O_EXCL,
                    PERMS as libc::c_uint,
                )
            };
            if f != -1 {
                (f, true)
            } else {
                let e = io::Error::last_os_error();
                if e.raw_os_error() != Some(libc::EEXIST) {
                    return Err(InitError::ResourceOpenFailed(e));
                }
                // Already exists — attach without resizing or reinitializing.
                let f2 = unsafe {
                    libc::shm_open(c_name.as_ptr(), libc::O_RDWR, PERMS as libc::c_uint)
                };
                if f2 == -1 {
                    return Err(InitError::ResourceOpenFailed(io::Error::last_os_error()));
                }
                (f2, false)
            }
        };

        if created {
            let ret = unsafe { libc::ftruncate(fd, size as libc::off_t) };
            if ret != 0 {
                let err = io::Error::last_os_error();
                unsafe {
                    libc::close(fd);
                    libc::shm_unlink(c_name.as_ptr());
                }
                return Err(InitError::ResourceResizeFailed(err));
            }
        }

        let mem = unsafe {
            libc::mmap(
                ptr::null_mut(),
                size,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_SHARED,
                fd,
                0,
            )
        };
        unsafe { libc::close(fd) };

        if mem == libc::MAP_FAILED {
            let err = io::Error::last_os_error();
            if created {
                unsafe { libc::shm_unlink(c_name.as_ptr()) };
            }
            return Err(InitError::MappingFailed(err));
        }

        let sem = mem as *mut libc::sem_t;

        if created {
            // pshared = 1, initial count 1: binary-mutex semantics across
            // any process that maps the same object.
            let ret = unsafe { libc::sem_init(sem, 1, 1) };
            if ret != 0 {
                let err = io::Error::last_os_error();
                unsafe {
                    libc::munmap(mem, size);
                    libc::shm_unlink(c_name.as_ptr());
                }
                return Err(InitError::InitFailed(err));
            }
        }

        Ok(Self { sem, name: c_name })
    }

    /// Remove the backing shm object by name without an open handle.
    pub fn unlink_by_name(posix_name: &str) {
        if let Ok(c_name) = CString::new(posix_name.as_bytes()) {
            unsafe { libc::shm_unlink(c_name.as_ptr()) };
        }
    }
}

impl Drop for ShmSemaphore {
    fn drop(&mut self) {
        // Best-effort teardown: destroy the in-place semaphore, drop the
        // mapping, then remove the name. First destroyer wins the unlink;
        // holders that already mapped the object keep their live pages, and
        // later unlinks fail with ENOENT, which is ignored here.
        unsafe {
            libc::sem_destroy(self.sem);
            libc::munmap(
                self.sem as *mut libc::c_void,
                std::mem::size_of::<libc::sem_t>(),
            );
            libc::shm_unlink(self.name.as_ptr());
        }
    }
}

// ---------------------------------------------------------------------------
// NamedSemaphore — POSIX named semaphore via sem_open (non-shared mode)
// ---------------------------------------------------------------------------

/// A POSIX named semaphore created or attached with count 1. The OS owns
/// the memory; this handle only holds the descriptor returned by sem_open.
pub struct NamedSemaphore {
    sem: *mut libc::sem_t,
    name: CString, // POSIX semaphore name (with leading '/')
}

// Safety: the handle refers to a kernel-managed semaphore; sem_wait and
// sem_post on it are thread-safe.
unsafe impl Send for NamedSemaphore {}
unsafe impl Sync for NamedSemaphore {}

impl NamedSemaphore {
    /// Create or attach to the named semaphore under `posix_name`.
    ///
    /// `O_CREAT` without `O_EXCL`: the initial count of 1 only applies when
    /// the semaphore does not exist yet; attaching never resets the count.
    pub fn create(posix_name: &str) -> Result<Self, InitError> {
        let c_name = to_c_name(posix_name)?;
        let sem = unsafe {
            libc::sem_open(
                c_name.as_ptr(),
                libc::O_CREAT,
                PERMS as libc::c_uint,
                1 as libc::c_uint,
            )
        };
        if sem == libc::SEM_FAILED {
            return Err(InitError::ResourceOpenFailed(io::Error::last_os_error()));
        }
        Ok(Self { sem, name: c_name })
    }

    /// Remove the named semaphore by name without an open handle.
    pub fn unlink_by_name(posix_name: &str) {
        if let Ok(c_name) = CString::new(posix_name.as_bytes()) {
            unsafe { libc::sem_unlink(c_name.as_ptr()) };
        }
    }
}

impl Drop for NamedSemaphore {
    fn drop(&mut self) {
        // Close our descriptor, then remove the name (first destroyer wins;
        // ENOENT from later unlinks is ignored). Processes that still hold
        // the semaphore open keep using it until their last close.
        unsafe {
            libc::sem_close(self.sem);
            libc::sem_unlink(self.name.as_ptr());
        }
    }
}
