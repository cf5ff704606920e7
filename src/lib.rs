//! A minimal Unix-style command shell.
//!
//! Four pieces compose the engine, leaves-first:
//!
//! * [`token`] turns one input line into a sequence of tagged tokens.
//! * [`parser`] turns a token sequence into a validated [`parser::Pipeline`]
//!   of [`parser::Stage`]s, or rejects it with a single [`parser::ParseError`].
//! * [`posix`] and [`spawn`] hold the OS-level mechanics (pipe
//!   creation, forking, fd wiring, `execvp`), one pipeline stage at a
//!   time.
//! * [`executor`] turns a whole `Pipeline` into running, reaped
//!   processes, and [`repl`] drives the prompt/read/execute loop that
//!   ties everything to stdin/stdout/stderr.
//!
//! [`src/bin/msh.rs`](../src/bin/msh.rs) is the thin binary that wires
//! this library to the process's real standard streams.

#![warn(missing_docs)]

extern crate libc;

mod token;
mod parser;
mod posix;
mod os_common;
mod spawn;
mod executor;
mod repl;

pub use self::executor::{run as execute, ExecError};
pub use self::os_common::ExitStatus;
pub use self::parser::{parse, ParseError, Pipeline, Stage};
pub use self::repl::run;
pub use self::token::{tokenize, Token};
