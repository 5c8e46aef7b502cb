//! # Error Taxonomy
//!
//! Probes never produce errors: a missing pattern or a failed read simply
//! means "not set". Only the mutators and the reconciler surface failures.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::system::ConfigItem;

/// Failure of a single interaction with the operating system.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The command ran and returned a non-zero status.
    #[error("command `{command}` failed ({status}): {output}")]
    CommandFailed {
        command: String,
        status: String,
        output: String,
    },
    /// The command could not be started at all.
    #[error("could not launch `{command}`: {source}")]
    Launch {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("command `{command}` did not finish within {after:?}")]
    Timeout { command: String, after: Duration },
    #[error("hosts file {}: {source}", path.display())]
    Hosts {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl GatewayError {
    /// The raw command line, when the error came from a command.
    pub fn command(&self) -> Option<&str> {
        match self {
            Self::CommandFailed { command, .. }
            | Self::Launch { command, .. }
            | Self::Timeout { command, .. } => Some(command),
            Self::Hosts { .. } => None,
        }
    }
}

/// Why an apply run stopped.
#[derive(Debug, Error)]
pub enum ApplyError {
    /// Nothing was attempted: configuring the interface needs administrator rights.
    #[error("insufficient privilege: run as administrator before applying configuration")]
    InsufficientPrivilege,
    /// `step` failed after `completed` had already been applied. Nothing is rolled back.
    #[error("{} failed: {source}", step.label())]
    Step {
        step: ConfigItem,
        completed: Vec<ConfigItem>,
        #[source]
        source: GatewayError,
    },
}
