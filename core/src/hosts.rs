//! Reading and appending the OS hosts file.
//!
//! No locking: the tool assumes it is the only writer while it runs.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use medlink_common::error::GatewayError;
use medlink_common::hosts::{HOSTS_MARKER, HostsEntry, HostsStatus};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct HostsFile {
    path: PathBuf,
}

impl HostsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File content with invalid UTF-8 replaced. A missing file reads as empty.
    pub fn read(&self) -> io::Result<String> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(e),
        }
    }

    pub fn status(&self, required: &[HostsEntry]) -> HostsStatus {
        if !self.path.exists() {
            return HostsStatus::unreadable(required);
        }
        match self.read() {
            Ok(content) => HostsStatus::inspect(&content, required),
            Err(e) => {
                warn!("could not read {}: {e}", self.path.display());
                HostsStatus::unreadable(required)
            }
        }
    }

    /// Appends every required entry whose domain is absent from the file as it
    /// reads right now, under a single marker comment. Creates the file when
    /// missing. Returns the entries written.
    pub fn append_missing(&self, required: &[HostsEntry]) -> Result<Vec<HostsEntry>, GatewayError> {
        let content: String = self.read().map_err(|source| self.error(source))?;
        let missing: Vec<HostsEntry> = HostsStatus::inspect(&content, required).missing;

        if missing.is_empty() {
            info!("hosts file already carries every required entry");
            return Ok(missing);
        }

        let mut block = String::new();
        if !content.is_empty() && !content.ends_with('\n') {
            block.push('\n');
        }
        block.push_str(HOSTS_MARKER);
        block.push('\n');
        for entry in &missing {
            block.push_str(&format!("{entry}\n"));
        }

        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| file.write_all(block.as_bytes()))
            .map_err(|source| self.error(source))?;

        info!("added {} hosts entries to {}", missing.len(), self.path.display());
        Ok(missing)
    }

    fn error(&self, source: io::Error) -> GatewayError {
        GatewayError::Hosts {
            path: self.path.clone(),
            source,
        }
    }
}
