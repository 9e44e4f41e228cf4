#![allow(dead_code)]

use std::os::raw::c_char;

use crate::interface::errnos::Errno;

// Flattened, platform-size-normalized stat snapshot handed across the FFI
// boundary. Field order is part of the ABI the managed caller reads; every
// field is widened to u64 so the layout does not vary by host.
// Derive eq attributes for testing whether the structs equal other stat
// snapshots of the same file.
#[derive(Eq, PartialEq, Default, Debug, Copy, Clone)]
#[repr(C)]
pub struct StatData {
    pub atime: u64,
    pub mtime: u64,
    pub ctime: u64,
    pub nlink: u64,
    pub rdev: u64,
    pub blksize: u64,
    pub blocks: u64,
    pub dev: u64,
    pub ino: u64,
    pub size: u64,
    pub mode: u64,
    pub gid: u64,
    pub uid: u64,
}

impl StatData {
    pub fn from_native(native: &libc::stat) -> StatData {
        StatData {
            atime: native.st_atime as u64,
            mtime: native.st_mtime as u64,
            ctime: native.st_ctime as u64,
            nlink: native.st_nlink as u64,
            rdev: native.st_rdev as u64,
            blksize: native.st_blksize as u64,
            blocks: native.st_blocks as u64,
            dev: native.st_dev as u64,
            ino: native.st_ino as u64,
            size: native.st_size as u64,
            mode: native.st_mode as u64,
            gid: native.st_gid as u64,
            uid: native.st_uid as u64,
        }
    }
}

// One descriptor redirection for a spawned child: descriptor `from` becomes
// a duplicate of `to` before the child image loads. Layout-compatible with
// a C int pair so the caller's flat array reinterprets directly.
#[derive(Eq, PartialEq, Default, Copy, Clone, Debug)]
#[repr(C)]
pub struct DupPair {
    pub from: i32,
    pub to: i32,
}

// One directory-stream advance. The name pointer aliases the stream's
// current dirent and stays valid until the next read or close on that
// stream, which is exactly the lifetime the managed caller relies on.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DirEntry {
    Name(*const c_char),
    EndOfStream,
    Failed(Errno),
}

// Why a child's state changed. Exactly one variant applies to a raw wait
// status; `Unknown` covers a status word matching none of the predicates.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum WaitStatus {
    Exited(i32),
    Signaled(i32),
    Stopped(i32),
    Unknown,
}

// Result of one waitpid round trip. `NoChange` is only reachable with
// WNOHANG-style options.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum WaitResult {
    Reaped(libc::pid_t, WaitStatus),
    NoChange,
    Failed(Errno),
}
