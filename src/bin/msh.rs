//! The shell's entry point: wires the REPL to the process's real
//! standard streams and propagates its exit code.

use std::io::{self, BufReader};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    let stdin = BufReader::new(io::stdin());
    let code = msh::run(stdin, io::stdout(), io::stderr());
    ExitCode::from(code as u8)
}
