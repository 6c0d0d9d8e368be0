//! # VFS Console
//!
//! Line-oriented front end for the namespace service.
//!
//! ## Philosophy
//!
//! - One command per line, no pipes, no shell features
//! - Commands only dispatch to the service
//! - A failed command prints an error and the loop carries on

pub mod commands;
pub mod console;

pub use commands::{CommandError, CommandParser, ConsoleCommand, COMMAND_USAGE};
pub use console::{CommandOutcome, Console};

use services_namespace::NamespaceOperations;
use std::io::{self, BufRead, Write};

/// Runs the console until `exit` or end of input
///
/// With `interactive` set a prompt is written before each line. Only a
/// failure to read input or write output ends the loop with an error.
pub fn run<S, R, W>(
    console: &mut Console<S>,
    mut input: R,
    output: &mut W,
    interactive: bool,
) -> io::Result<()>
where
    S: NamespaceOperations,
    R: BufRead,
    W: Write,
{
    let mut line = String::new();
    loop {
        if interactive {
            write!(output, "{}", console.prompt())?;
            output.flush()?;
        }

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        let outcome = console.execute_line(&line);
        for text in &outcome.lines {
            writeln!(output, "{}", text)?;
        }
        if outcome.exit {
            break;
        }
    }

    output.flush()
}
