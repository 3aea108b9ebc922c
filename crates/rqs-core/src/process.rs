//! Process collaborators: executable lookup and shell execution

use std::io;
use std::process::Command;

/// Answers whether a program name is runnable on this system
pub trait Probe {
    fn is_executable(&self, program: &str) -> bool;
}

impl<F> Probe for F
where
    F: Fn(&str) -> bool,
{
    fn is_executable(&self, program: &str) -> bool {
        self(program)
    }
}

/// Looks programs up on `PATH`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProbe;

impl Probe for SystemProbe {
    fn is_executable(&self, program: &str) -> bool {
        let found = which::which(program).is_ok();
        tracing::trace!(program, found, "executable lookup");
        found
    }
}

/// Runs a command line attached to the current terminal
pub trait Runner {
    /// Run `command_line` and return its exit code
    fn run(&self, command_line: &str) -> io::Result<i32>;
}

/// Runs command lines through `sh -c` with inherited stdio
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellRunner;

impl Runner for ShellRunner {
    fn run(&self, command_line: &str) -> io::Result<i32> {
        tracing::debug!("spawning shell command");
        let status = Command::new("sh").arg("-c").arg(command_line).status()?;

        // Killed by a signal
        Ok(status.code().unwrap_or(1))
    }
}

/// Quote a single argument for a POSIX shell
pub fn shell_quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:,@+%".contains(c));

    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', "'\\''"))
    }
}
