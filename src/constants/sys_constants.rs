// System related constants

// Wire-level sentinel for the unselected slots of the waitpid result
// triple. Distinct from any exit code (0-255) and any signal number.
pub const WAIT_STATUS_UNSET: i32 = -1000;

// getpriority errors are re-based below the legal nice range (-20..20)
// as PRIORITY_ERRNO_BASE - errno.
pub const PRIORITY_ERRNO_BASE: i32 = -100;

// Slots of the getrusage seconds array: self user/system time, then
// children user/system time.
pub const RUSAGE_SLOTS: usize = 4;

pub const NANOS_PER_SEC: i64 = 1_000_000_000;
pub const MICROS_PER_SEC: i64 = 1_000_000;
