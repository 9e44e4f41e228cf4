// Process wrappers: spawning with descriptor redirection and process-group
// assignment, wait-status decoding, scheduling priority and CPU accounting.
#![allow(dead_code)]

use std::ffi::{CStr, CString};
use std::mem;
use std::os::raw::c_char;
use std::ptr;

use crate::interface::errnos::{current_errno, get_errno, set_errno, Errno};
use crate::interface::timer::timeval_to_seconds;
use crate::interface::types::{DupPair, WaitResult, WaitStatus};

/*
 *  Scoped spawn configuration. The file-action list and the attribute block
 *  are kernel-side objects with explicit init/destroy pairs; wrapping them
 *  in owning structs ties the destroy to Drop, so every exit path out of a
 *  launch attempt releases whatever was acquired, exactly once. Neither
 *  object may outlive the single spawn call it was built for.
 */

pub struct FileActions {
    raw: libc::posix_spawn_file_actions_t,
}

impl FileActions {
    pub fn new() -> Result<FileActions, Errno> {
        let mut raw = mem::MaybeUninit::<libc::posix_spawn_file_actions_t>::uninit();
        let ret = unsafe { libc::posix_spawn_file_actions_init(raw.as_mut_ptr()) };
        if ret != 0 {
            return Err(Errno::from_discriminant(ret).unwrap_or(Errno::EINVAL));
        }
        Ok(FileActions {
            raw: unsafe { raw.assume_init() },
        })
    }

    /// Register "duplicate `to` onto `from`" for the child. Actions run in
    /// registration order at child start, so a later registration targeting
    /// the same descriptor overrides an earlier one.
    pub fn add_dup2(&mut self, pair: DupPair) -> Result<(), Errno> {
        let ret =
            unsafe { libc::posix_spawn_file_actions_adddup2(&mut self.raw, pair.to, pair.from) };
        if ret != 0 {
            return Err(Errno::from_discriminant(ret).unwrap_or(Errno::EINVAL));
        }
        Ok(())
    }

    fn as_ptr(&self) -> *const libc::posix_spawn_file_actions_t {
        &self.raw
    }
}

impl Drop for FileActions {
    fn drop(&mut self) {
        unsafe { libc::posix_spawn_file_actions_destroy(&mut self.raw) };
    }
}

pub struct SpawnAttrs {
    raw: libc::posix_spawnattr_t,
}

impl SpawnAttrs {
    pub fn new() -> Result<SpawnAttrs, Errno> {
        let mut raw = mem::MaybeUninit::<libc::posix_spawnattr_t>::uninit();
        let ret = unsafe { libc::posix_spawnattr_init(raw.as_mut_ptr()) };
        if ret != 0 {
            return Err(Errno::from_discriminant(ret).unwrap_or(Errno::EINVAL));
        }
        Ok(SpawnAttrs {
            raw: unsafe { raw.assume_init() },
        })
    }

    pub fn set_pgroup(&mut self, pgroup: libc::pid_t) -> Result<(), Errno> {
        let ret = unsafe {
            libc::posix_spawnattr_setflags(
                &mut self.raw,
                libc::POSIX_SPAWN_SETPGROUP as libc::c_short,
            )
        };
        if ret != 0 {
            return Err(Errno::from_discriminant(ret).unwrap_or(Errno::EINVAL));
        }
        let ret = unsafe { libc::posix_spawnattr_setpgroup(&mut self.raw, pgroup) };
        if ret != 0 {
            return Err(Errno::from_discriminant(ret).unwrap_or(Errno::EINVAL));
        }
        Ok(())
    }

    fn as_ptr(&self) -> *const libc::posix_spawnattr_t {
        &self.raw
    }
}

impl Drop for SpawnAttrs {
    fn drop(&mut self) {
        unsafe { libc::posix_spawnattr_destroy(&mut self.raw) };
    }
}

/*
 *  Here is the Linux man page for posix_spawn:
 *  https://man7.org/linux/man-pages/man3/posix_spawn.3.html
 *
 *  The command is resolved against PATH (spawnp), not treated as a bare
 *  path. The file-action list is built only when redirections were
 *  requested and the attribute block only when a process group was
 *  requested; a setup failure at either step short-circuits the launch with
 *  that step's error and the spawn primitive is never reached. Drop on the
 *  scoped objects covers cleanup on all of those paths as well as after the
 *  spawn itself.
 *
 *  argv and envp are borrowed null-terminated pointer vectors in the C
 *  convention; they are forwarded untouched.
 */
pub unsafe fn spawnp_raw(
    command: *const c_char,
    argv: *const *mut c_char,
    envp: *const *mut c_char,
    redirects: &[DupPair],
    pgroup: Option<libc::pid_t>,
) -> Result<libc::pid_t, Errno> {
    let mut file_actions = None;
    if !redirects.is_empty() {
        let mut actions = FileActions::new()?;
        for pair in redirects {
            actions.add_dup2(*pair)?;
        }
        file_actions = Some(actions);
    }

    let mut attrs = None;
    if let Some(pg) = pgroup {
        let mut a = SpawnAttrs::new()?;
        a.set_pgroup(pg)?;
        attrs = Some(a);
    }

    let mut pid: libc::pid_t = -1;
    let ret = libc::posix_spawnp(
        &mut pid,
        command,
        file_actions.as_ref().map_or(ptr::null(), |a| a.as_ptr()),
        attrs.as_ref().map_or(ptr::null(), |a| a.as_ptr()),
        argv,
        envp,
    );
    if ret != 0 {
        return Err(Errno::from_discriminant(ret).unwrap_or(Errno::EINVAL));
    }
    Ok(pid)
}

/// Owned-argument front end over `spawnp_raw` for in-process callers: builds
/// the null-terminated argv/envp vectors from CStrings.
pub fn spawnp(
    command: &CStr,
    args: &[CString],
    env: &[CString],
    redirects: &[DupPair],
    pgroup: Option<libc::pid_t>,
) -> Result<libc::pid_t, Errno> {
    let mut argv: Vec<*mut c_char> = args.iter().map(|a| a.as_ptr() as *mut c_char).collect();
    argv.push(ptr::null_mut());
    let mut envp: Vec<*mut c_char> = env.iter().map(|e| e.as_ptr() as *mut c_char).collect();
    envp.push(ptr::null_mut());
    unsafe { spawnp_raw(command.as_ptr(), argv.as_ptr(), envp.as_ptr(), redirects, pgroup) }
}

/*
 *   waitpid() decodes the raw status word into exactly one outcome.
 *   Precedence is exited, then signaled, then stopped; the predicates are
 *   exclusive by OS convention, so the order only matters if a platform's
 *   macros were ever non-exclusive. A result pid of zero (only reachable
 *   with WNOHANG) and a failure are returned undecoded. No EINTR retry is
 *   performed here; retry policy belongs to the caller.
 */
pub fn wait_for_child(pid: libc::pid_t, options: i32) -> WaitResult {
    let mut status: libc::c_int = 0;
    let reaped = unsafe { libc::waitpid(pid, &mut status, options) };
    if reaped == 0 {
        return WaitResult::NoChange;
    }
    if reaped < 0 {
        return WaitResult::Failed(current_errno("waitpid"));
    }

    let decoded = if libc::WIFEXITED(status) {
        WaitStatus::Exited(libc::WEXITSTATUS(status))
    } else if libc::WIFSIGNALED(status) {
        WaitStatus::Signaled(libc::WTERMSIG(status))
    } else if libc::WIFSTOPPED(status) {
        WaitStatus::Stopped(libc::WSTOPSIG(status))
    } else {
        WaitStatus::Unknown
    };
    WaitResult::Reaped(reaped, decoded)
}

/// Scheduling priority ("nice" value) for a scope/who pair.
///
/// getpriority can legitimately return -1, so errno is cleared before the
/// call and only a -1 paired with a fresh errno counts as failure.
pub fn process_priority(which: i32, who: libc::id_t) -> Result<i32, Errno> {
    set_errno(0);
    let prio = unsafe { libc::getpriority(which as _, who) };
    if prio == -1 && get_errno() != 0 {
        return Err(current_errno("getpriority"));
    }
    Ok(prio)
}

/// CPU seconds consumed by this process and by its reaped children:
/// [self user, self system, children user, children system].
pub fn cpu_times() -> Result<[f64; 4], Errno> {
    let mut usage = mem::MaybeUninit::<libc::rusage>::uninit();
    let ret = unsafe { libc::getrusage(libc::RUSAGE_SELF, usage.as_mut_ptr()) };
    if ret != 0 {
        return Err(current_errno("getrusage"));
    }
    let own = unsafe { usage.assume_init() };

    let mut usage = mem::MaybeUninit::<libc::rusage>::uninit();
    let ret = unsafe { libc::getrusage(libc::RUSAGE_CHILDREN, usage.as_mut_ptr()) };
    if ret != 0 {
        return Err(current_errno("getrusage"));
    }
    let children = unsafe { usage.assume_init() };

    Ok([
        timeval_to_seconds(&own.ru_utime),
        timeval_to_seconds(&own.ru_stime),
        timeval_to_seconds(&children.ru_utime),
        timeval_to_seconds(&children.ru_stime),
    ])
}
