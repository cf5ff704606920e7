//! Thin wrappers over the POSIX calls the executor needs: pipe
//! creation, forking, fd duplication, `execvp`, and reaping. Kept
//! deliberately close to the raw syscalls rather than wrapped in a
//! richer abstraction.

use std::ffi::{CString, OsStr};
use std::fs::File;
use std::io::{Error, Result};
use std::os::unix::ffi::OsStrExt;
use std::os::unix::io::{FromRawFd, RawFd};
use std::ptr;

use crate::os_common::ExitStatus;

fn check_err<T: Ord + Default>(num: T) -> Result<T> {
    if num < T::default() {
        return Err(Error::last_os_error());
    }
    Ok(num)
}

pub fn pipe() -> Result<(File, File)> {
    let mut fds = [0 as libc::c_int; 2];
    check_err(unsafe { libc::pipe(fds.as_mut_ptr()) })?;
    Ok(unsafe { (File::from_raw_fd(fds[0]), File::from_raw_fd(fds[1])) })
}

/// # Safety
/// Only async-signal-safe operations may run in the child between this
/// call and a subsequent `execvp`/`exit_immediately`.
pub unsafe fn fork() -> Result<u32> {
    check_err(unsafe { libc::fork() }).map(|pid| pid as u32)
}

fn os_to_cstring(s: &OsStr) -> Result<CString> {
    let bytes = s.as_bytes();
    if bytes.iter().any(|&b| b == 0) {
        return Err(Error::from_raw_os_error(libc::EINVAL));
    }
    Ok(CString::new(bytes)
        // not expected to fail on Unix, as Unix paths *are* C strings
        .expect("converting Unix path to C string"))
}

pub fn execvp<S1: AsRef<OsStr>, S2: AsRef<OsStr>>(cmd: S1, args: &[S2]) -> Result<()> {
    let args_cstring: Vec<CString> = args
        .iter()
        .map(|x| os_to_cstring(x.as_ref()))
        .collect::<Result<_>>()?;
    let mut args_ptr: Vec<*const libc::c_char> =
        args_cstring.iter().map(|s| s.as_ptr()).collect();
    args_ptr.push(ptr::null());

    let cmd_cstring = os_to_cstring(cmd.as_ref())?;
    check_err(unsafe { libc::execvp(cmd_cstring.as_ptr(), args_ptr.as_ptr()) })?;
    unreachable!("execvp only returns when it failed, and check_err already reported that")
}

pub fn exit_immediately(status: u8) -> ! {
    unsafe { libc::_exit(status as libc::c_int) }
}

pub fn waitpid(pid: u32) -> Result<ExitStatus> {
    let mut status: libc::c_int = 0;
    check_err(unsafe { libc::waitpid(pid as libc::pid_t, &mut status, 0) })?;
    Ok(decode_exit_status(status))
}

fn decode_exit_status(status: libc::c_int) -> ExitStatus {
    unsafe {
        if libc::WIFEXITED(status) {
            ExitStatus::Exited(libc::WEXITSTATUS(status) as u32)
        } else if libc::WIFSIGNALED(status) {
            ExitStatus::Signaled(libc::WTERMSIG(status) as u8)
        } else {
            ExitStatus::Other(status)
        }
    }
}

pub fn dup2(oldfd: RawFd, newfd: RawFd) -> Result<()> {
    check_err(unsafe { libc::dup2(oldfd, newfd) })?;
    Ok(())
}

pub fn close_raw(fd: RawFd) {
    unsafe {
        libc::close(fd);
    }
}
