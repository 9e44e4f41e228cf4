// Advisory file locking behind one interface with two backing
// implementations: native flock(2), and whole-file record locks for hosts
// without it. Both compile everywhere so either can be exercised on any
// host; a registry selects the active one at startup.
#![allow(dead_code)]

use parking_lot::RwLock;

use crate::constants::{LOCK_EX, LOCK_NB, LOCK_SH, LOCK_UN};
use crate::interface::errnos::{current_errno, get_errno, Errno};

pub trait AdvisoryLock: Send + Sync {
    /// Apply a LOCK_SH/LOCK_EX/LOCK_UN operation, optionally LOCK_NB, to an
    /// open descriptor. Blocks until the lock is available unless LOCK_NB is
    /// set, in which case a held lock reports EAGAIN (the normalized
    /// would-block code).
    fn apply(&self, fd: i32, operation: i32) -> Result<(), Errno>;
}

/// flock(2) passthrough.
pub struct FlockLock;

impl AdvisoryLock for FlockLock {
    fn apply(&self, fd: i32, operation: i32) -> Result<(), Errno> {
        let ret = unsafe { libc::flock(fd, operation) };
        if ret != 0 {
            return Err(current_errno("flock"));
        }
        Ok(())
    }
}

/// Record-lock emulation over the whole file, for hosts without flock.
/// Byte range 0..0 from the file start covers the entire file, matching the
/// granularity flock callers expect.
pub struct RecordLock;

impl AdvisoryLock for RecordLock {
    fn apply(&self, fd: i32, operation: i32) -> Result<(), Errno> {
        let l_type = match operation & !LOCK_NB {
            LOCK_SH => libc::F_RDLCK,
            LOCK_EX => libc::F_WRLCK,
            LOCK_UN => libc::F_UNLCK,
            _ => return Err(Errno::EINVAL),
        };
        let mut lock = libc::flock {
            l_type: l_type as libc::c_short,
            l_whence: libc::SEEK_SET as libc::c_short,
            l_start: 0,
            l_len: 0,
            l_pid: 0,
        };
        let cmd = if operation & LOCK_NB != 0 {
            libc::F_SETLK
        } else {
            libc::F_SETLKW
        };
        let ret = unsafe { libc::fcntl(fd, cmd, &mut lock) };
        if ret == -1 {
            // fcntl reports a held lock as EACCES on some hosts; normalize
            // to the single would-block code the caller checks for.
            let errno = get_errno();
            if errno == libc::EAGAIN || errno == libc::EACCES {
                return Err(Errno::EAGAIN);
            }
            return Err(current_errno("fcntl"));
        }
        Ok(())
    }
}

#[cfg(target_os = "solaris")]
fn default_backend() -> Box<dyn AdvisoryLock> {
    Box::new(RecordLock)
}

#[cfg(not(target_os = "solaris"))]
fn default_backend() -> Box<dyn AdvisoryLock> {
    Box::new(FlockLock)
}

lazy_static::lazy_static! {
    static ref ACTIVE_LOCK: RwLock<Box<dyn AdvisoryLock>> = RwLock::new(default_backend());
}

/// Apply an advisory-lock operation through the active backend.
pub fn apply_lock(fd: i32, operation: i32) -> Result<(), Errno> {
    ACTIVE_LOCK.read().apply(fd, operation)
}

/// Replace the active backend. Intended for startup configuration by the
/// embedding runtime and for exercising the emulation in tests.
pub fn set_lock_backend(backend: Box<dyn AdvisoryLock>) {
    *ACTIVE_LOCK.write() = backend;
}
