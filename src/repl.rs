//! The read-eval-print loop: prompts, reads one line, tokenizes,
//! parses, executes, and reports, looping until `exit` or end-of-input.

use std::io::{BufRead, Write};

use log::{debug, trace, warn};

use crate::executor;
use crate::parser::parse;
use crate::token::{tokenize, Token};

const PROMPT: &str = "> ";

/// Runs the loop to completion, returning the shell's own exit code (`0`
/// after `exit` or end-of-input: the only two ways this returns).
pub fn run<R, O, E>(mut input: R, mut stdout: O, mut stderr: E) -> i32
where
    R: BufRead,
    O: Write,
    E: Write,
{
    loop {
        let _ = write!(stdout, "{PROMPT}");
        let _ = stdout.flush();

        let mut raw = String::new();
        let bytes_read = match input.read_line(&mut raw) {
            Ok(n) => n,
            Err(e) => {
                warn!("reading a command line failed, treating it as end-of-input: {e}");
                0
            }
        };
        if bytes_read == 0 {
            debug!("end-of-input on stdin");
            return 0;
        }
        let line = raw.strip_suffix('\n').unwrap_or(&raw);

        let tokens = tokenize(line);
        if tokens.is_empty() {
            trace!("empty line");
            continue;
        }
        if is_exit(&tokens) {
            debug!("exit command");
            return 0;
        }

        let pipeline = match parse(&tokens) {
            Ok(p) => p,
            Err(e) => {
                let _ = writeln!(stderr, "{e}");
                let _ = stderr.flush();
                continue;
            }
        };

        match executor::run(&pipeline) {
            Ok(results) => {
                for (label, status) in &results {
                    let _ = writeln!(stdout, "{label} exit status: {}", status.code());
                }
                let _ = stdout.flush();
            }
            Err(e) => {
                let _ = writeln!(stderr, "{e}");
                let _ = stderr.flush();
            }
        }
    }
}

fn is_exit(tokens: &[Token]) -> bool {
    matches!(tokens, [Token::Word(w)] if w == "exit")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run_str(input: &str) -> (i32, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = run(Cursor::new(input.as_bytes()), &mut out, &mut err);
        (
            code,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn exit_terminates_with_status_zero_and_no_status_line() {
        let (code, out, _err) = run_str("exit\n");
        assert_eq!(code, 0);
        assert_eq!(out, "> ");
    }

    #[test]
    fn end_of_input_is_equivalent_to_exit() {
        let (code, out, _err) = run_str("");
        assert_eq!(code, 0);
        assert_eq!(out, "> ");
    }

    #[test]
    fn empty_line_reprompts_without_a_status_line() {
        let (code, out, _err) = run_str("\nexit\n");
        assert_eq!(code, 0);
        assert_eq!(out, "> > ");
    }

    #[test]
    fn parse_error_reports_invalid_command_and_reprompts() {
        let (code, out, err) = run_str("> foo.txt < bar.txt\nexit\n");
        assert_eq!(code, 0);
        assert_eq!(out, "> > ");
        assert!(err.to_lowercase().contains("invalid command"));
    }

    #[test]
    fn successful_command_prints_one_status_line() {
        let (code, out, err) = run_str("/bin/true\nexit\n");
        assert_eq!(code, 0);
        assert!(out.contains("/bin/true exit status: 0"));
        assert!(err.is_empty());
    }

    #[test]
    fn pipeline_prints_one_status_line_per_stage_in_order() {
        let (_code, out, _err) = run_str("/bin/echo hi | /bin/cat\nexit\n");
        let first = out.find("/bin/echo exit status:").unwrap();
        let second = out.find("/bin/cat exit status:").unwrap();
        assert!(first < second);
    }

    #[test]
    fn pipe_without_surrounding_spaces_is_a_single_command() {
        let (_code, out, _err) = run_str("/bin/echo this|argument|has|pipes\nexit\n");
        assert!(out.contains("this|argument|has|pipes"));
        assert_eq!(out.matches("exit status:").count(), 1);
    }
}
