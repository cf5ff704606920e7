//! Runs a whole [`Pipeline`]: creates every connecting pipe up front,
//! forks one child per stage in order, and waits for all of them.

use std::error::Error;
use std::fmt;
use std::fs::File;
use std::io;

use log::{debug, warn};

use crate::os_common::ExitStatus;
use crate::parser::Pipeline;
use crate::spawn::spawn_stage;

/// Failures that happen in the parent before/while bringing up a
/// pipeline's children. Distinct from a stage exiting non-zero, which
/// isn't an error at this layer at all; just a status to report.
#[derive(Debug)]
pub enum ExecError {
    PipeCreateFail(io::Error),
    ForkFail(io::Error),
}

impl fmt::Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExecError::PipeCreateFail(e) => write!(f, "pipe: {e}"),
            ExecError::ForkFail(e) => write!(f, "fork: {e}"),
        }
    }
}

impl Error for ExecError {}

/// A forked-and-running (or already-reaped) pipeline stage: its pid and
/// the label (argv[0]) it will be reported under. Owned by the executor
/// until [`reap`]ed.
struct SpawnedChild {
    pid: u32,
    label: String,
}

/// Runs every stage of `pipeline` to completion and returns each stage's
/// label (its argv[0]) paired with its exit status, in stage order.
///
/// All `N - 1` pipes are created before any `fork`, so a failure midway
/// through forking never leaves an already-running child blocked on a
/// pipe end nobody will ever connect. If a `fork` fails partway through,
/// the children already spawned are reaped silently (no status is
/// reported for them) and [`ExecError::ForkFail`] is returned.
pub fn run(pipeline: &Pipeline) -> Result<Vec<(String, ExitStatus)>, ExecError> {
    let stage_count = pipeline.stages.len();
    let mut pipes: Vec<(File, File)> = Vec::with_capacity(stage_count.saturating_sub(1));
    for _ in 0..stage_count.saturating_sub(1) {
        pipes.push(crate::posix::pipe().map_err(ExecError::PipeCreateFail)?);
    }

    debug!("running {stage_count}-stage pipeline");
    let mut children: Vec<SpawnedChild> = Vec::with_capacity(stage_count);
    let mut fork_err = None;
    for (i, stage) in pipeline.stages.iter().enumerate() {
        match spawn_stage(i, stage_count, stage, &pipes) {
            Ok(pid) => children.push(SpawnedChild {
                pid,
                label: stage.argv[0].clone(),
            }),
            Err(e) => {
                fork_err = Some(e);
                break;
            }
        }
    }

    // The parent never touches a pipe end again once every stage that
    // needs it has forked (each child dup2's the ends it wants and
    // drops the rest on its own side); drop them here so no surviving
    // child blocks on a write/read end only the parent was holding.
    drop(pipes);

    if let Some(e) = fork_err {
        warn!(
            "fork failed after spawning {} of {stage_count} stage(s), reaping and aborting",
            children.len()
        );
        for child in &children {
            reap(child.pid);
        }
        return Err(ExecError::ForkFail(e));
    }

    let results = children
        .into_iter()
        .map(|child| {
            let status = reap(child.pid);
            (child.label, status)
        })
        .collect();
    Ok(results)
}

/// Waits for `pid` to exit, discarding the result on an unexpected
/// `waitpid` failure (it can only mean the pid has already been reaped,
/// which never happens here since every pid is waited on exactly once).
fn reap(pid: u32) -> ExitStatus {
    match crate::posix::waitpid(pid) {
        Ok(status) => status,
        Err(e) => {
            warn!("waitpid({pid}) failed unexpectedly: {e}");
            ExitStatus::Other(-1)
        }
    }
}
