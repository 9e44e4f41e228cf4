// File and directory wrappers: directory streams, the stat family,
// timestamp updates and passwd lookups.
#![allow(dead_code)]

use std::ffi::{CStr, CString};
use std::mem;
use std::ptr;

use crate::constants::GETPW_BUF_LEN;
use crate::interface::errnos::{current_errno, get_errno, set_errno, Errno};
use crate::interface::types::{DirEntry, StatData};

/// Advance a directory stream one entry.
///
/// readdir reports both end-of-stream and failure as a null return, so the
/// thread-local errno is cleared before the call and inspected only when the
/// call returns null. The ambient-register dance is confined to this
/// function; callers only ever see the tagged result.
pub fn read_dir_entry(dirp: *mut libc::DIR) -> DirEntry {
    set_errno(0);
    let entry = unsafe { libc::readdir(dirp) };
    if !entry.is_null() {
        return DirEntry::Name(unsafe { (*entry).d_name.as_ptr() });
    }
    match get_errno() {
        0 => DirEntry::EndOfStream,
        _ => DirEntry::Failed(current_errno("readdir")),
    }
}

pub fn rewind_dir(dirp: *mut libc::DIR) {
    unsafe { libc::rewinddir(dirp) };
}

/*
 *   stat family: each call produces a fresh flattened snapshot, never a
 *   cached one. lstat does not follow symbolic links.
 */

pub fn stat_path(path: &CStr) -> Result<StatData, Errno> {
    let mut native = mem::MaybeUninit::<libc::stat>::uninit();
    let ret = unsafe { libc::stat(path.as_ptr(), native.as_mut_ptr()) };
    if ret != 0 {
        return Err(current_errno("stat"));
    }
    Ok(StatData::from_native(unsafe { &native.assume_init() }))
}

pub fn stat_fd(fd: i32) -> Result<StatData, Errno> {
    let mut native = mem::MaybeUninit::<libc::stat>::uninit();
    let ret = unsafe { libc::fstat(fd, native.as_mut_ptr()) };
    if ret != 0 {
        return Err(current_errno("fstat"));
    }
    Ok(StatData::from_native(unsafe { &native.assume_init() }))
}

pub fn stat_link_path(path: &CStr) -> Result<StatData, Errno> {
    let mut native = mem::MaybeUninit::<libc::stat>::uninit();
    let ret = unsafe { libc::lstat(path.as_ptr(), native.as_mut_ptr()) };
    if ret != 0 {
        return Err(current_errno("lstat"));
    }
    Ok(StatData::from_native(unsafe { &native.assume_init() }))
}

/// Set both timestamps of a path with nanosecond precision.
pub fn set_file_times(
    path: &CStr,
    atime_sec: i64,
    atime_nsec: i64,
    mtime_sec: i64,
    mtime_nsec: i64,
) -> Result<(), Errno> {
    let times = [
        libc::timespec {
            tv_sec: atime_sec as libc::time_t,
            tv_nsec: atime_nsec as libc::c_long,
        },
        libc::timespec {
            tv_sec: mtime_sec as libc::time_t,
            tv_nsec: mtime_nsec as libc::c_long,
        },
    ];
    let ret = unsafe { libc::utimensat(libc::AT_FDCWD, path.as_ptr(), times.as_ptr(), 0) };
    if ret != 0 {
        return Err(current_errno("utimensat"));
    }
    Ok(())
}

/// Home directory of the named user via the re-entrant passwd lookup.
/// `Ok(None)` means the user does not exist, which is not an error.
pub fn user_home_dir(name: &CStr) -> Result<Option<CString>, Errno> {
    let mut buflen = {
        let hint = unsafe { libc::sysconf(libc::_SC_GETPW_R_SIZE_MAX) };
        if hint > 0 {
            hint as usize
        } else {
            GETPW_BUF_LEN
        }
    };

    loop {
        let mut buf = vec![0u8; buflen];
        let mut entry = mem::MaybeUninit::<libc::passwd>::uninit();
        let mut result: *mut libc::passwd = ptr::null_mut();
        let ret = unsafe {
            libc::getpwnam_r(
                name.as_ptr(),
                entry.as_mut_ptr(),
                buf.as_mut_ptr() as *mut libc::c_char,
                buflen,
                &mut result,
            )
        };
        if ret == libc::ERANGE {
            buflen *= 2;
            continue;
        }
        if ret == libc::EINTR {
            continue;
        }
        if ret != 0 {
            return Err(Errno::from_discriminant(ret).unwrap_or(Errno::EINVAL));
        }
        if result.is_null() {
            return Ok(None);
        }
        let home = unsafe { CStr::from_ptr((*result).pw_dir) };
        return Ok(Some(home.to_owned()));
    }
}
