// The flat FFI surface the managed runtime binds against. Every function
// here marshals C arguments into the interface wrappers and re-encodes the
// tagged outcome into the wire convention the caller expects: flat structs,
// negated error codes and sentinel integers. This file is the only place
// those sentinel encodings exist.

use std::ffi::CStr;
use std::os::raw::{c_char, c_int, c_long, c_uint};
use std::ptr;
use std::slice;

use crate::constants::{PRIORITY_ERRNO_BASE, WAIT_STATUS_UNSET};
use crate::interface;
use crate::interface::errnos::{set_errno, syscall_error, Errno};
use crate::interface::types::{DirEntry, DupPair, StatData, WaitResult, WaitStatus};

// End-of-stream marker handed back by hostposix_readdir.
static EMPTY_NAME: &[u8] = b"\0";

unsafe fn int_slice_mut<'a>(ptr: *mut c_int, len: c_int) -> &'a mut [i32] {
    if ptr.is_null() || len <= 0 {
        &mut []
    } else {
        slice::from_raw_parts_mut(ptr, len as usize)
    }
}

/// Advance a directory stream: the next entry name, an empty string at
/// end-of-stream, or NULL with errno set if the read failed.
#[no_mangle]
pub extern "C" fn hostposix_readdir(dirp: *mut libc::DIR) -> *const c_char {
    match interface::read_dir_entry(dirp) {
        DirEntry::Name(name) => name,
        DirEntry::EndOfStream => EMPTY_NAME.as_ptr() as *const c_char,
        DirEntry::Failed(e) => {
            set_errno(e as i32);
            ptr::null()
        }
    }
}

#[no_mangle]
pub extern "C" fn hostposix_rewinddir(dirp: *mut libc::DIR) {
    interface::rewind_dir(dirp);
}

/// The "nice" value for a scope/who pair. The legal range overlaps the OS
/// error sentinel, so a failure is re-based to -100 - errno, below any
/// priority a platform can report.
#[no_mangle]
pub extern "C" fn hostposix_getpriority(which: c_int, who: libc::id_t) -> c_int {
    match interface::process_priority(which, who) {
        Ok(prio) => prio,
        Err(e) => PRIORITY_ERRNO_BASE - (e as i32),
    }
}

/// Reap one child-state change into `result`, an int[3] of
/// (exit code, terminating signal, stopping signal) where exactly one slot
/// is set and the others stay at the unset sentinel. A return of 0 means no
/// state change was available (non-blocking wait only); a negative return
/// is the wait failure with errno set. The triple is written only when a
/// process was actually reaped.
#[no_mangle]
pub extern "C" fn hostposix_waitpid(
    pid: libc::pid_t,
    options: c_int,
    result: *mut c_int,
) -> libc::pid_t {
    match interface::wait_for_child(pid, options) {
        WaitResult::NoChange => 0,
        WaitResult::Failed(e) => {
            set_errno(e as i32);
            -1
        }
        WaitResult::Reaped(reaped, status) => {
            let triple = unsafe { slice::from_raw_parts_mut(result, 3) };
            triple[0] = WAIT_STATUS_UNSET;
            triple[1] = WAIT_STATUS_UNSET;
            triple[2] = WAIT_STATUS_UNSET;
            match status {
                WaitStatus::Exited(code) => triple[0] = code,
                WaitStatus::Signaled(sig) => triple[1] = sig,
                WaitStatus::Stopped(sig) => triple[2] = sig,
                WaitStatus::Unknown => {}
            }
            reaped
        }
    }
}

#[no_mangle]
pub extern "C" fn hostposix_flock(fd: c_int, operation: c_int) -> c_int {
    match interface::apply_lock(fd, operation) {
        Ok(()) => 0,
        Err(e) => {
            set_errno(e as i32);
            -1
        }
    }
}

#[no_mangle]
pub extern "C" fn hostposix_stat(path: *const c_char, buffer: *mut StatData) -> c_int {
    let path = unsafe { CStr::from_ptr(path) };
    match interface::stat_path(path) {
        Ok(data) => {
            unsafe { *buffer = data };
            0
        }
        Err(e) => {
            set_errno(e as i32);
            -1
        }
    }
}

#[no_mangle]
pub extern "C" fn hostposix_fstat(fd: c_int, buffer: *mut StatData) -> c_int {
    match interface::stat_fd(fd) {
        Ok(data) => {
            unsafe { *buffer = data };
            0
        }
        Err(e) => {
            set_errno(e as i32);
            -1
        }
    }
}

#[no_mangle]
pub extern "C" fn hostposix_lstat(path: *const c_char, buffer: *mut StatData) -> c_int {
    let path = unsafe { CStr::from_ptr(path) };
    match interface::stat_link_path(path) {
        Ok(data) => {
            unsafe { *buffer = data };
            0
        }
        Err(e) => {
            set_errno(e as i32);
            -1
        }
    }
}

/// Read a clock as one nanosecond count. A failure collapses to 0, which is
/// indistinguishable from a legitimate near-zero reading; the managed
/// caller has always accepted that trade for a single flat return.
#[no_mangle]
pub extern "C" fn hostposix_clock_gettime(clock: c_int) -> i64 {
    match interface::clock_read(clock) {
        Ok(nanos) => nanos,
        Err(_) => 0,
    }
}

/// Launch a child process. `redirects` is a flat int array of
/// (from, to) descriptor pairs applied in order, `nredirects` its length in
/// ints; a negative `pgroup` means no process-group assignment. Returns the
/// new pid (> 0) or the negated error code (< 0), never 0.
#[no_mangle]
pub extern "C" fn hostposix_posix_spawnp(
    command: *const c_char,
    argv: *const *mut c_char,
    envp: *const *mut c_char,
    nredirects: c_int,
    redirects: *const c_int,
    pgroup: libc::pid_t,
) -> libc::pid_t {
    if nredirects % 2 != 0 {
        return syscall_error(Errno::EINVAL, "posix_spawnp", "odd redirection count");
    }
    let pairs: &[DupPair] = if nredirects > 0 && !redirects.is_null() {
        // DupPair is two C ints, so the caller's flat array reinterprets
        // directly as pairs.
        unsafe { slice::from_raw_parts(redirects as *const DupPair, nredirects as usize / 2) }
    } else {
        &[]
    };
    let pgroup = if pgroup >= 0 { Some(pgroup) } else { None };

    match unsafe { interface::spawnp_raw(command, argv, envp, pairs, pgroup) } {
        Ok(pid) => pid,
        Err(e) => syscall_error(e, "posix_spawnp", "spawn failed"),
    }
}

#[no_mangle]
pub extern "C" fn hostposix_major(dev: libc::dev_t) -> c_uint {
    libc::major(dev)
}

#[no_mangle]
pub extern "C" fn hostposix_minor(dev: libc::dev_t) -> c_uint {
    libc::minor(dev)
}

#[no_mangle]
pub extern "C" fn hostposix_utimes(
    path: *const c_char,
    atime_sec: c_long,
    atime_nsec: c_int,
    mtime_sec: c_long,
    mtime_nsec: c_int,
) -> c_int {
    let path = unsafe { CStr::from_ptr(path) };
    match interface::set_file_times(
        path,
        atime_sec as i64,
        atime_nsec as i64,
        mtime_sec as i64,
        mtime_nsec as i64,
    ) {
        Ok(()) => 0,
        Err(e) => {
            set_errno(e as i32);
            -1
        }
    }
}

/// CPU seconds for this process and its reaped children, written into a
/// double[4] of (self user, self system, children user, children system).
#[no_mangle]
pub extern "C" fn hostposix_getrusage(times: *mut f64) -> c_int {
    match interface::cpu_times() {
        Ok(seconds) => {
            let out = unsafe { slice::from_raw_parts_mut(times, seconds.len()) };
            out.copy_from_slice(&seconds);
            0
        }
        Err(e) => {
            set_errno(e as i32);
            -1
        }
    }
}

/// select over three flat descriptor arrays with a microsecond timeout
/// (negative blocks indefinitely). On a positive return, array entries
/// whose descriptor is not ready are overwritten with -1.
#[no_mangle]
pub extern "C" fn hostposix_select(
    nread: c_int,
    readfds: *mut c_int,
    nwrite: c_int,
    writefds: *mut c_int,
    nexcept: c_int,
    exceptfds: *mut c_int,
    timeout_us: c_long,
) -> c_int {
    let readfds = unsafe { int_slice_mut(readfds, nread) };
    let writefds = unsafe { int_slice_mut(writefds, nwrite) };
    let exceptfds = unsafe { int_slice_mut(exceptfds, nexcept) };
    match interface::select_descriptors(readfds, writefds, exceptfds, timeout_us as i64) {
        Ok(ready) => ready,
        Err(e) => {
            set_errno(e as i32);
            -1
        }
    }
}

/// Home directory of the named user as a malloc-owned string the caller
/// frees; an empty string when the user does not exist, NULL with errno set
/// on failure.
#[no_mangle]
pub extern "C" fn hostposix_get_user_home(name: *const c_char) -> *mut c_char {
    let name = unsafe { CStr::from_ptr(name) };
    match interface::user_home_dir(name) {
        Ok(Some(home)) => unsafe { libc::strdup(home.as_ptr()) },
        Ok(None) => unsafe { libc::strdup(EMPTY_NAME.as_ptr() as *const c_char) },
        Err(e) => {
            set_errno(e as i32);
            ptr::null_mut()
        }
    }
}
