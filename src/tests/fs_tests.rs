#[allow(unused_parens)]
#[cfg(test)]
pub mod fs_tests {
    use crate::constants::{LOCK_EX, LOCK_NB, LOCK_SH, LOCK_UN};
    use crate::dispatcher::*;
    use crate::interface;
    use crate::interface::{AdvisoryLock, DirEntry, Errno, FlockLock, RecordLock, StatData};
    use crate::tests::setup;

    use std::ffi::{CStr, CString};
    use std::fs::{File, OpenOptions};
    use std::io::Write;
    use std::os::unix::io::AsRawFd;

    fn cstring(s: &str) -> CString {
        CString::new(s).unwrap()
    }

    // Drain a directory stream into owned names. Each name pointer is only
    // valid until the next read, so it is copied out immediately.
    fn collect_entries(dirp: *mut libc::DIR) -> Vec<String> {
        let mut names = Vec::new();
        loop {
            match interface::read_dir_entry(dirp) {
                DirEntry::Name(ptr) => {
                    let name = unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned();
                    names.push(name);
                }
                DirEntry::EndOfStream => break,
                DirEntry::Failed(e) => panic!("directory read failed: {:?}", e),
            }
        }
        names
    }

    #[test]
    pub fn ut_hostposix_readdir_walks_and_rewinds() {
        //acquiring a lock on TESTMUTEX prevents other tests from running concurrently,
        // and also performs clean env setup
        let _thelock = setup::lock_and_init();

        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("alpha")).unwrap();
        File::create(dir.path().join("beta")).unwrap();

        let path = cstring(dir.path().to_str().unwrap());
        let dirp = unsafe { libc::opendir(path.as_ptr()) };
        assert!(!dirp.is_null());

        let names = collect_entries(dirp);
        assert!(names.contains(&"alpha".to_string()));
        assert!(names.contains(&"beta".to_string()));
        assert!(names.contains(&".".to_string()));
        assert!(names.contains(&"..".to_string()));

        // Exhausted stream keeps reporting end-of-stream as "" on the wire.
        let end = hostposix_readdir(dirp);
        assert!(!end.is_null());
        assert_eq!(unsafe { *end }, 0);

        // A rewind starts the walk over from the first entry.
        hostposix_rewinddir(dirp);
        let again = collect_entries(dirp);
        assert_eq!(again.len(), names.len());

        unsafe { libc::closedir(dirp) };
    }

    #[test]
    pub fn ut_hostposix_stat_size_tracks_truncate() {
        //acquiring a lock on TESTMUTEX prevents other tests from running concurrently,
        // and also performs clean env setup
        let _thelock = setup::lock_and_init();

        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("sized");
        let mut f = File::create(&file_path).unwrap();
        f.write_all(&[7u8; 2048]).unwrap();
        f.sync_all().unwrap();

        let path = cstring(file_path.to_str().unwrap());
        let data = interface::stat_path(&path).unwrap();
        assert_eq!(data.size, 2048);

        // A fresh call observes the truncation; nothing is cached.
        f.set_len(0).unwrap();
        let data = interface::stat_path(&path).unwrap();
        assert_eq!(data.size, 0);
    }

    #[test]
    pub fn ut_hostposix_stat_missing_path_reports_enoent() {
        //acquiring a lock on TESTMUTEX prevents other tests from running concurrently,
        // and also performs clean env setup
        let _thelock = setup::lock_and_init();

        let path = cstring("/hostposix-no-such-path");
        assert_eq!(interface::stat_path(&path), Err(Errno::ENOENT));

        // Same failure over the wire: -1 with errno set.
        let mut buffer = StatData::default();
        let ret = hostposix_stat(path.as_ptr(), &mut buffer);
        assert_eq!(ret, -1);
        assert_eq!(interface::get_errno(), libc::ENOENT);
    }

    #[test]
    pub fn ut_hostposix_lstat_does_not_follow_links() {
        //acquiring a lock on TESTMUTEX prevents other tests from running concurrently,
        // and also performs clean env setup
        let _thelock = setup::lock_and_init();

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("target");
        let link = dir.path().join("link");
        File::create(&target).unwrap();
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let link_path = cstring(link.to_str().unwrap());
        let through = interface::stat_path(&link_path).unwrap();
        let direct = interface::stat_link_path(&link_path).unwrap();

        assert_eq!(through.mode as u32 & libc::S_IFMT, libc::S_IFREG);
        assert_eq!(direct.mode as u32 & libc::S_IFMT, libc::S_IFLNK);
    }

    #[test]
    pub fn ut_hostposix_fstat_matches_stat() {
        //acquiring a lock on TESTMUTEX prevents other tests from running concurrently,
        // and also performs clean env setup
        let _thelock = setup::lock_and_init();

        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("same");
        let f = File::create(&file_path).unwrap();

        let path = cstring(file_path.to_str().unwrap());
        let by_path = interface::stat_path(&path).unwrap();
        let by_fd = interface::stat_fd(f.as_raw_fd()).unwrap();

        assert_eq!(by_path.dev, by_fd.dev);
        assert_eq!(by_path.ino, by_fd.ino);
    }

    #[test]
    pub fn ut_hostposix_flock_nonblocking_conflict() {
        //acquiring a lock on TESTMUTEX prevents other tests from running concurrently,
        // and also performs clean env setup
        let _thelock = setup::lock_and_init();

        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("locked");
        File::create(&file_path).unwrap();

        // Two separate opens give two open file descriptions, which is what
        // flock arbitrates between.
        let holder = File::open(&file_path).unwrap();
        let contender = File::open(&file_path).unwrap();

        assert_eq!(FlockLock.apply(holder.as_raw_fd(), LOCK_EX), Ok(()));
        assert_eq!(
            FlockLock.apply(contender.as_raw_fd(), LOCK_EX | LOCK_NB),
            Err(Errno::EAGAIN)
        );

        // Releasing the first lock unblocks the contender.
        assert_eq!(FlockLock.apply(holder.as_raw_fd(), LOCK_UN), Ok(()));
        assert_eq!(
            FlockLock.apply(contender.as_raw_fd(), LOCK_EX | LOCK_NB),
            Ok(())
        );
    }

    #[test]
    pub fn ut_hostposix_flock_wire_contract() {
        //acquiring a lock on TESTMUTEX prevents other tests from running concurrently,
        // and also performs clean env setup
        let _thelock = setup::lock_and_init();

        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("wire");
        let f = File::create(&file_path).unwrap();

        assert_eq!(hostposix_flock(f.as_raw_fd(), LOCK_SH), 0);
        assert_eq!(hostposix_flock(f.as_raw_fd(), LOCK_UN), 0);
    }

    #[test]
    pub fn ut_hostposix_record_lock_backend() {
        //acquiring a lock on TESTMUTEX prevents other tests from running concurrently,
        // and also performs clean env setup
        let _thelock = setup::lock_and_init();

        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("record");
        let f = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&file_path)
            .unwrap();

        // Shared then exclusive then unlock all succeed within one process;
        // record locks upgrade in place.
        assert_eq!(RecordLock.apply(f.as_raw_fd(), LOCK_SH), Ok(()));
        assert_eq!(RecordLock.apply(f.as_raw_fd(), LOCK_EX), Ok(()));
        assert_eq!(RecordLock.apply(f.as_raw_fd(), LOCK_UN), Ok(()));

        // An operation that is none of SH/EX/UN is rejected before reaching
        // the OS.
        assert_eq!(RecordLock.apply(f.as_raw_fd(), 0x40), Err(Errno::EINVAL));
    }

    #[test]
    pub fn ut_hostposix_utimes_roundtrip() {
        //acquiring a lock on TESTMUTEX prevents other tests from running concurrently,
        // and also performs clean env setup
        let _thelock = setup::lock_and_init();

        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("stamped");
        File::create(&file_path).unwrap();

        let path = cstring(file_path.to_str().unwrap());
        assert_eq!(
            hostposix_utimes(path.as_ptr(), 1_000_000, 0, 2_000_000, 0),
            0
        );

        let data = interface::stat_path(&path).unwrap();
        assert_eq!(data.atime, 1_000_000);
        assert_eq!(data.mtime, 2_000_000);
    }

    #[test]
    pub fn ut_hostposix_select_reports_ready_pipe() {
        //acquiring a lock on TESTMUTEX prevents other tests from running concurrently,
        // and also performs clean env setup
        let _thelock = setup::lock_and_init();

        let mut ready_pipe = [0i32; 2];
        let mut idle_pipe = [0i32; 2];
        assert_eq!(unsafe { libc::pipe(ready_pipe.as_mut_ptr()) }, 0);
        assert_eq!(unsafe { libc::pipe(idle_pipe.as_mut_ptr()) }, 0);
        assert_eq!(
            unsafe { libc::write(ready_pipe[1], b"x".as_ptr() as *const libc::c_void, 1) },
            1
        );

        let mut readfds = [ready_pipe[0], idle_pipe[0]];
        let ready = interface::select_descriptors(&mut readfds, &mut [], &mut [], 100_000).unwrap();
        assert_eq!(ready, 1);
        // The ready descriptor keeps its slot; the idle one is rewritten.
        assert_eq!(readfds[0], ready_pipe[0]);
        assert_eq!(readfds[1], -1);

        // Nothing readable on the idle pipe with a zero timeout.
        let mut readfds = [idle_pipe[0]];
        let ready = interface::select_descriptors(&mut readfds, &mut [], &mut [], 0).unwrap();
        assert_eq!(ready, 0);

        for fd in ready_pipe.iter().chain(idle_pipe.iter()) {
            unsafe { libc::close(*fd) };
        }
    }

    #[test]
    pub fn ut_hostposix_major_minor_recompose() {
        //acquiring a lock on TESTMUTEX prevents other tests from running concurrently,
        // and also performs clean env setup
        let _thelock = setup::lock_and_init();

        let dev = libc::makedev(8, 1);
        assert_eq!(hostposix_major(dev), 8);
        assert_eq!(hostposix_minor(dev), 1);
    }

    #[test]
    pub fn ut_hostposix_get_user_home() {
        //acquiring a lock on TESTMUTEX prevents other tests from running concurrently,
        // and also performs clean env setup
        let _thelock = setup::lock_and_init();

        let root = cstring("root");
        let home = interface::user_home_dir(&root).unwrap().unwrap();
        assert!(home.to_str().unwrap().starts_with('/'));

        // Unknown users are "no home", not an error; the wire form is an
        // empty malloc-owned string.
        let nobody = cstring("hostposix-no-such-user");
        assert_eq!(interface::user_home_dir(&nobody).unwrap(), None);

        let wire = hostposix_get_user_home(nobody.as_ptr());
        assert!(!wire.is_null());
        assert_eq!(unsafe { *wire }, 0);
        unsafe { libc::free(wire as *mut libc::c_void) };
    }
}
