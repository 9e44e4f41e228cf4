// Descriptor-readiness wrappers for select.
#![allow(dead_code)]

use std::mem;
use std::ptr;

use crate::interface::errnos::{current_errno, Errno};
use crate::interface::timer::timeout_from_micros;

// Implementations of select related FD_SET structure
pub struct FdSet(libc::fd_set);

impl FdSet {
    pub fn new() -> FdSet {
        unsafe {
            let mut raw_fd_set = mem::MaybeUninit::<libc::fd_set>::uninit();
            libc::FD_ZERO(raw_fd_set.as_mut_ptr());
            FdSet(raw_fd_set.assume_init())
        }
    }

    // turn on the fd bit in fd_set
    pub fn set(&mut self, fd: i32) {
        unsafe { libc::FD_SET(fd, &mut self.0) }
    }

    pub fn is_set(&self, fd: i32) -> bool {
        unsafe { libc::FD_ISSET(fd, &self.0 as *const libc::fd_set) }
    }

    pub fn as_raw_mut(&mut self) -> *mut libc::fd_set {
        &mut self.0
    }
}

fn collect_into(set: &mut FdSet, fds: &[i32], nfds: &mut i32) {
    for &fd in fds {
        if fd < 0 {
            continue;
        }
        set.set(fd);
        if fd + 1 > *nfds {
            *nfds = fd + 1;
        }
    }
}

// Overwrite every entry whose descriptor is not in the ready set with -1;
// ready entries keep their value so the caller can scan for >= 0.
fn mark_ready(fds: &mut [i32], set: &FdSet) {
    for slot in fds.iter_mut() {
        if *slot >= 0 && !set.is_set(*slot) {
            *slot = -1;
        }
    }
}

/// Wait for readiness on three descriptor lists. A negative timeout blocks
/// indefinitely; otherwise the timeout is in microseconds. On a positive
/// return each list is rewritten in place to contain only the ready
/// descriptors (non-ready entries become -1).
pub fn select_descriptors(
    readfds: &mut [i32],
    writefds: &mut [i32],
    exceptfds: &mut [i32],
    timeout_us: i64,
) -> Result<i32, Errno> {
    let mut readset = FdSet::new();
    let mut writeset = FdSet::new();
    let mut exceptset = FdSet::new();
    let mut nfds = 0;
    collect_into(&mut readset, readfds, &mut nfds);
    collect_into(&mut writeset, writefds, &mut nfds);
    collect_into(&mut exceptset, exceptfds, &mut nfds);

    let mut timeout = timeout_from_micros(timeout_us);
    let timeout_ptr = timeout
        .as_mut()
        .map_or(ptr::null_mut(), |t| t as *mut libc::timeval);

    let ready = unsafe {
        libc::select(
            nfds,
            readset.as_raw_mut(),
            writeset.as_raw_mut(),
            exceptset.as_raw_mut(),
            timeout_ptr,
        )
    };
    if ready < 0 {
        return Err(current_errno("select"));
    }
    if ready > 0 {
        mark_ready(readfds, &readset);
        mark_ready(writefds, &writeset);
        mark_ready(exceptfds, &exceptset);
    }
    Ok(ready)
}
