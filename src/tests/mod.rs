#![allow(dead_code)] //suppress warning for these functions not being used in targets other than the
                     // tests

pub mod fs_tests;

pub mod setup {
    use parking_lot::{Mutex, MutexGuard};

    lazy_static::lazy_static! {
        // Process-wide operations (spawn/wait, advisory locks, priority)
        // must not interleave across tests.
        static ref TESTMUTEX: Mutex<()> = Mutex::new(());
    }

    pub fn lock_and_init() -> MutexGuard<'static, ()> {
        TESTMUTEX.lock()
    }
}
