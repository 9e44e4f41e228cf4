// Errno handling for the hostposix interface.
//
// Failures never cross the FFI boundary as panics or unwinds; every wrapped
// call converts the thread-local errno into an `Errno` value here, and the
// dispatcher re-encodes it into whatever wire form the managed caller
// expects.

use std::sync::atomic::{AtomicUsize, Ordering};

// When nonzero, failed calls print a one-line diagnostic to stderr.
pub static VERBOSE: AtomicUsize = AtomicUsize::new(0);

pub fn set_verbosity(level: usize) {
    VERBOSE.store(level, Ordering::Relaxed);
}

#[repr(i32)]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Errno {
    EPERM = 1,         // Operation not permitted
    ENOENT = 2,        // No such file or directory
    ESRCH = 3,         // No such process
    EINTR = 4,         // Interrupted system call
    EIO = 5,           // I/O error
    ENXIO = 6,         // No such device or address
    E2BIG = 7,         // Argument list too long
    ENOEXEC = 8,       // Exec format error
    EBADF = 9,         // Bad file number
    ECHILD = 10,       // No child processes
    EAGAIN = 11,       // Try again; equals EWOULDBLOCK on every supported host
    ENOMEM = 12,       // Out of memory
    EACCES = 13,       // Permission denied
    EFAULT = 14,       // Bad address
    ENOTBLK = 15,      // Block device required
    EBUSY = 16,        // Device or resource busy
    EEXIST = 17,       // File exists
    EXDEV = 18,        // Cross-device link
    ENODEV = 19,       // No such device
    ENOTDIR = 20,      // Not a directory
    EISDIR = 21,       // Is a directory
    EINVAL = 22,       // Invalid argument
    ENFILE = 23,       // File table overflow
    EMFILE = 24,       // Too many open files
    ENOTTY = 25,       // Not a typewriter
    ETXTBSY = 26,      // Text file busy
    EFBIG = 27,        // File too large
    ENOSPC = 28,       // No space left on device
    ESPIPE = 29,       // Illegal seek
    EROFS = 30,        // Read-only file system
    EMLINK = 31,       // Too many links
    EPIPE = 32,        // Broken pipe
    EDOM = 33,         // Math argument out of domain of func
    ERANGE = 34,       // Math result not representable
    EDEADLK = 35,      // Resource deadlock would occur
    ENAMETOOLONG = 36, // File name too long
    ENOLCK = 37,       // No record locks available
    ENOSYS = 38,       // Function not implemented
    ENOTEMPTY = 39,    // Directory not empty
    ELOOP = 40,        // Too many symbolic links encountered
}

impl Errno {
    pub fn from_discriminant(discriminant: i32) -> Result<Errno, ()> {
        match discriminant {
            1 => Ok(Errno::EPERM),
            2 => Ok(Errno::ENOENT),
            3 => Ok(Errno::ESRCH),
            4 => Ok(Errno::EINTR),
            5 => Ok(Errno::EIO),
            6 => Ok(Errno::ENXIO),
            7 => Ok(Errno::E2BIG),
            8 => Ok(Errno::ENOEXEC),
            9 => Ok(Errno::EBADF),
            10 => Ok(Errno::ECHILD),
            11 => Ok(Errno::EAGAIN),
            12 => Ok(Errno::ENOMEM),
            13 => Ok(Errno::EACCES),
            14 => Ok(Errno::EFAULT),
            15 => Ok(Errno::ENOTBLK),
            16 => Ok(Errno::EBUSY),
            17 => Ok(Errno::EEXIST),
            18 => Ok(Errno::EXDEV),
            19 => Ok(Errno::ENODEV),
            20 => Ok(Errno::ENOTDIR),
            21 => Ok(Errno::EISDIR),
            22 => Ok(Errno::EINVAL),
            23 => Ok(Errno::ENFILE),
            24 => Ok(Errno::EMFILE),
            25 => Ok(Errno::ENOTTY),
            26 => Ok(Errno::ETXTBSY),
            27 => Ok(Errno::EFBIG),
            28 => Ok(Errno::ENOSPC),
            29 => Ok(Errno::ESPIPE),
            30 => Ok(Errno::EROFS),
            31 => Ok(Errno::EMLINK),
            32 => Ok(Errno::EPIPE),
            33 => Ok(Errno::EDOM),
            34 => Ok(Errno::ERANGE),
            35 => Ok(Errno::EDEADLK),
            36 => Ok(Errno::ENAMETOOLONG),
            37 => Ok(Errno::ENOLCK),
            38 => Ok(Errno::ENOSYS),
            39 => Ok(Errno::ENOTEMPTY),
            40 => Ok(Errno::ELOOP),
            _ => Err(()),
        }
    }
}

#[cfg(any(target_os = "linux", target_os = "android"))]
pub fn get_errno() -> i32 {
    (unsafe { *libc::__errno_location() }) as i32
}

#[cfg(any(target_os = "macos", target_os = "ios"))]
pub fn get_errno() -> i32 {
    (unsafe { *libc::__error() }) as i32
}

#[cfg(any(target_os = "linux", target_os = "android"))]
pub fn set_errno(value: i32) {
    unsafe { *libc::__errno_location() = value };
}

#[cfg(any(target_os = "macos", target_os = "ios"))]
pub fn set_errno(value: i32) {
    unsafe { *libc::__error() = value };
}

/// Convert the thread-local errno left by a failed call into an `Errno`.
/// errno values outside the table collapse to EINVAL rather than panicking
/// across the boundary.
pub fn current_errno(syscall: &str) -> Errno {
    let errno = get_errno();
    let e = Errno::from_discriminant(errno).unwrap_or(Errno::EINVAL);
    if VERBOSE.load(Ordering::Relaxed) > 0 {
        eprintln!("Error in syscall: {} errno {} -> {:?}", syscall, errno, e);
    }
    e
}

/// Negated return for call sites that speak raw i32: logs when verbose and
/// returns -(errno).
pub fn syscall_error(e: Errno, syscall: &str, message: &str) -> i32 {
    if VERBOSE.load(Ordering::Relaxed) > 0 {
        eprintln!("Error in syscall: {} - {:?}: {}", syscall, e, message);
    }
    -(e as i32)
}

/// Negated-errno translation of the current thread-local errno.
pub fn handle_errno(errno: i32, syscall: &str) -> i32 {
    let e = Errno::from_discriminant(errno).unwrap_or(Errno::EINVAL);
    syscall_error(e, syscall, "syscall failed")
}
