//! # Command Runner
//!
//! Every OS interaction of the Windows gateway goes through [`CommandRunner`]
//! so the parsing and command construction can be exercised without Windows.

use std::process::{Command, Output};

use medlink_common::error::GatewayError;
use medlink_common::utils::console::decode_output;
use tracing::debug;

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn combined(&self) -> String {
        match (self.stdout.trim(), self.stderr.trim()) {
            (out, "") => out.to_string(),
            ("", err) => err.to_string(),
            (out, err) => format!("{out}\n{err}"),
        }
    }
}

pub trait CommandRunner: Send + Sync {
    /// Runs `program` to completion. A non-zero exit status is an error that
    /// carries the command line and everything it printed.
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, GatewayError>;
}

/// Renders a command the way a user would type it, for logs and errors.
pub fn command_line(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .map(|part| {
            if part.contains(char::is_whitespace) {
                format!("\"{part}\"")
            } else {
                part.to_string()
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Runs commands on the local machine without flashing a console window.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, GatewayError> {
        let line: String = command_line(program, args);
        debug!("running {line}");

        let mut command = Command::new(program);
        command.args(args);
        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            command.creation_flags(CREATE_NO_WINDOW);
        }

        let output: Output = command.output().map_err(|source| GatewayError::Launch {
            command: line.clone(),
            source,
        })?;

        let result = CommandOutput {
            stdout: decode_output(&output.stdout),
            stderr: decode_output(&output.stderr),
        };

        if !output.status.success() {
            return Err(GatewayError::CommandFailed {
                command: line,
                status: output.status.to_string(),
                output: result.combined(),
            });
        }

        Ok(result)
    }
}
