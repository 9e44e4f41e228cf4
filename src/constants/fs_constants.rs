// File-system related constants

// Advisory lock operations, passed through unchanged from the caller.
pub use libc::{LOCK_EX, LOCK_NB, LOCK_SH, LOCK_UN};

// Starting size for the re-entrant passwd lookup buffer when sysconf
// does not report one; doubled on ERANGE.
pub const GETPW_BUF_LEN: usize = 16384;
