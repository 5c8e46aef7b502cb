//! # Hosts Model
//!
//! Required name resolutions for the medical network and the logic deciding
//! which of them a hosts file already carries.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// Comment written once above every batch of appended entries.
pub const HOSTS_MARKER: &str = "# medical insurance network";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostsEntry {
    pub ip: Ipv4Addr,
    pub domain: String,
}

impl HostsEntry {
    pub fn new(ip: Ipv4Addr, domain: impl Into<String>) -> Self {
        Self {
            ip,
            domain: domain.into(),
        }
    }
}

impl fmt::Display for HostsEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.ip, self.domain)
    }
}

impl FromStr for HostsEntry {
    type Err = String;

    /// Parses a hosts line of the form `ip<whitespace>domain`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let (Some(ip), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(format!("invalid hosts entry: {s}"));
        };
        let ip: Ipv4Addr = ip
            .parse()
            .map_err(|_| format!("invalid address in hosts entry: {s}"))?;
        Ok(Self::new(ip, domain))
    }
}

/// Which required entries a hosts file already contains.
///
/// An entry counts as present when its domain appears anywhere in the file,
/// regardless of the address it is mapped to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostsStatus {
    pub existing: Vec<HostsEntry>,
    pub missing: Vec<HostsEntry>,
}

impl HostsStatus {
    pub fn inspect(content: &str, required: &[HostsEntry]) -> Self {
        let (existing, missing) = required
            .iter()
            .cloned()
            .partition(|entry| content.contains(entry.domain.as_str()));
        Self { existing, missing }
    }

    /// The file could not be read, so nothing is present.
    pub fn unreadable(required: &[HostsEntry]) -> Self {
        Self {
            existing: Vec::new(),
            missing: required.to_vec(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}
