//! Process exit status, shared between the spawn and executor layers.

use std::fmt;

#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum ExitStatus {
    Exited(u32),      // exited
    Signaled(u8),     // terminated by signal
    Other(i32),       // other possibilities - see waitpid(2)
}

impl ExitStatus {
    pub fn success(&self) -> bool {
        matches!(self, ExitStatus::Exited(0))
    }

    /// The decimal code to print in a status line: the exit code if the
    /// process exited normally, or 128+signal by the usual shell
    /// convention if it was killed.
    pub fn code(&self) -> i32 {
        match *self {
            ExitStatus::Exited(code) => code as i32,
            ExitStatus::Signaled(sig) => 128 + sig as i32,
            ExitStatus::Other(raw) => raw,
        }
    }
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
