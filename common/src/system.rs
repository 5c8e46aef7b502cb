//! # System Gateway (Port)
//!
//! The interface configuration and the hosts file are process-wide OS state
//! with no in-process model. [`SystemGateway`] is the whole contract the
//! reconciler needs from them: four side-effect-free probes and the mutators
//! that close the gaps they report.
//!
//! The Windows implementation lives in `medlink-core`; tests drive the
//! reconciler through fakes.

use std::fmt;

use crate::error::GatewayError;
use crate::hosts::{HostsEntry, HostsStatus};
use crate::network::interface::NetworkInterface;

/// One independently tracked piece of the target configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConfigItem {
    StaticIp,
    Route,
    Mtu,
    HostsFile,
}

impl ConfigItem {
    /// Canonical order. The route's gateway is derived from the static IP, so
    /// `StaticIp` always comes first.
    pub const ALL: [ConfigItem; 4] = [
        ConfigItem::StaticIp,
        ConfigItem::Route,
        ConfigItem::Mtu,
        ConfigItem::HostsFile,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ConfigItem::StaticIp => "IP address",
            ConfigItem::Route => "route",
            ConfigItem::Mtu => "MTU",
            ConfigItem::HostsFile => "hosts file",
        }
    }

    /// Progress message shown once the step has run.
    pub fn progress_message(self) -> &'static str {
        match self {
            ConfigItem::StaticIp => "Configuring IP address...",
            ConfigItem::Route => "Adding persistent route...",
            ConfigItem::Mtu => "Setting MTU...",
            ConfigItem::HostsFile => "Updating hosts file...",
        }
    }
}

impl fmt::Display for ConfigItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub trait SystemGateway: Send + Sync {
    fn list_interfaces(&self) -> Result<Vec<NetworkInterface>, GatewayError>;

    /// Whether the process may change interface settings and the hosts file.
    fn is_elevated(&self) -> bool;

    // Probes. Any failure to read or parse reads as "not set".

    fn ip_already_set(&self, iface: &str) -> bool;
    fn mtu_already_set(&self, iface: &str) -> bool;
    /// `true` only when every required entry is present.
    fn hosts_already_set(&self) -> bool {
        self.hosts_status().is_complete()
    }
    fn route_already_set(&self) -> bool;
    fn hosts_status(&self) -> HostsStatus;

    // Mutators. Each issues one OS operation and reports its failure verbatim.

    fn set_static_ip(&self, iface: &str, ip: &str, mask: &str) -> Result<(), GatewayError>;
    fn set_dns(&self, iface: &str, dns: &str) -> Result<(), GatewayError>;
    fn set_mtu(&self, iface: &str, mtu: u32) -> Result<(), GatewayError>;
    fn add_persistent_route(&self, gateway: &str) -> Result<(), GatewayError>;
    /// Appends the required entries whose domain is not yet present and
    /// returns the lines actually written.
    fn append_hosts_entries(&self) -> Result<Vec<HostsEntry>, GatewayError>;
}
