//! Forks and execs a single pipeline stage: one stage among N, wired to
//! files and/or neighboring pipes instead of always to three private
//! pipe ends.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::AsRawFd;

use log::{debug, trace};

use crate::parser::Stage;
use crate::posix;

/// Forks one child for `stage`, wires up its standard streams, and
/// `execvp`s it. Only returns in the parent, with the child's pid; the
/// child path never returns (it always ends in `execvp` or
/// [`posix::exit_immediately`]).
///
/// `index`/`stage_count` locate this stage within the pipeline so the
/// right neighboring pipe ends can be selected; `pipes[i]` connects
/// stage `i` to stage `i + 1`.
pub fn spawn_stage(
    index: usize,
    stage_count: usize,
    stage: &Stage,
    pipes: &[(File, File)],
) -> io::Result<u32> {
    let pid = unsafe { posix::fork() }?;
    if pid != 0 {
        debug!("stage {index} ({}) forked as pid {pid}", stage.argv[0]);
        return Ok(pid);
    }
    run_child(index, stage_count, stage, pipes)
}

/// The child's side of [`spawn_stage`]. Never returns.
fn run_child(index: usize, stage_count: usize, stage: &Stage, pipes: &[(File, File)]) -> ! {
    trace!("stage {index}: installing redirections");
    install_stdin(index, stage, pipes);
    install_stdout(index, stage_count, stage, pipes);

    // Every fd belonging to the pipe table is parent/sibling-owned from
    // this child's point of view: close all of them now that the ones
    // we need are dup'd onto 0/1, so a sibling stage never blocks on a
    // write end this child forgot to close.
    for (read_end, write_end) in pipes {
        posix::close_raw(read_end.as_raw_fd());
        posix::close_raw(write_end.as_raw_fd());
    }

    trace!("stage {index}: exec {:?}", stage.argv);
    if let Err(e) = posix::execvp(&stage.argv[0], &stage.argv) {
        // Reported by the child itself; the parent only ever observes
        // this as an ordinary non-zero exit.
        let _ = writeln!(io::stderr(), "{}: {e}", stage.argv[0]);
        posix::exit_immediately(127);
    }
    unreachable!("execvp only returns on error");
}

/// Opens `path` for a redirection, reporting failure to the child's own
/// stderr and exiting immediately.
fn open_redirection_or_die(path: &str, for_output: bool) -> File {
    let result = if for_output {
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o644)
            .open(path)
    } else {
        OpenOptions::new().read(true).open(path)
    };
    match result {
        Ok(f) => f,
        Err(e) => {
            let _ = writeln!(io::stderr(), "{path}: {e}");
            posix::exit_immediately(127);
        }
    }
}

fn install_stdin(index: usize, stage: &Stage, pipes: &[(File, File)]) {
    // The file redirection is always opened first, so a missing file
    // errors the stage even when a pipe connection ends up winning.
    let file_redirect = stage
        .stdin_path
        .as_deref()
        .map(|path| open_redirection_or_die(path, false));

    if index > 0 {
        let prev_read = pipes[index - 1].0.as_raw_fd();
        posix::dup2(prev_read, 0).expect("dup2 onto stdin");
    } else if let Some(f) = file_redirect {
        posix::dup2(f.as_raw_fd(), 0).expect("dup2 onto stdin");
    }
    // else: inherit the parent's stdin untouched.
}

fn install_stdout(index: usize, stage_count: usize, stage: &Stage, pipes: &[(File, File)]) {
    let file_redirect = stage
        .stdout_path
        .as_deref()
        .map(|path| open_redirection_or_die(path, true));

    if index < stage_count - 1 {
        let next_write = pipes[index].1.as_raw_fd();
        posix::dup2(next_write, 1).expect("dup2 onto stdout");
    } else if let Some(f) = file_redirect {
        posix::dup2(f.as_raw_fd(), 1).expect("dup2 onto stdout");
    }
    // else: inherit the parent's stdout untouched.
}
