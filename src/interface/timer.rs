// Clock and time-value helpers.
#![allow(dead_code)]

use crate::constants::{MICROS_PER_SEC, NANOS_PER_SEC};
use crate::interface::errnos::{current_errno, Errno};

/// Read an OS clock and collapse the (seconds, nanoseconds) pair into one
/// nanosecond count.
pub fn clock_read(clockid: i32) -> Result<i64, Errno> {
    let mut ts = libc::timespec {
        tv_sec: 0,
        tv_nsec: 0,
    };
    let ret = unsafe { libc::clock_gettime(clockid as libc::clockid_t, &mut ts) };
    if ret != 0 {
        return Err(current_errno("clock_gettime"));
    }
    Ok(ts.tv_sec as i64 * NANOS_PER_SEC + ts.tv_nsec as i64)
}

pub fn timeval_to_seconds(tv: &libc::timeval) -> f64 {
    tv.tv_sec as f64 + tv.tv_usec as f64 / MICROS_PER_SEC as f64
}

/// Select-style timeout: non-negative microseconds become a timeval, a
/// negative count means block indefinitely.
pub fn timeout_from_micros(micros: i64) -> Option<libc::timeval> {
    if micros < 0 {
        return None;
    }
    Some(libc::timeval {
        tv_sec: (micros / MICROS_PER_SEC) as libc::time_t,
        tv_usec: (micros % MICROS_PER_SEC) as libc::suseconds_t,
    })
}
