//! # Windows System Gateway
//!
//! [`SystemGateway`] backed by `ipconfig`, `netsh`, `route` and the hosts
//! file. Probes swallow every failure and answer "not set" so the reconciler
//! re-applies rather than aborts; mutators report failures verbatim.

use std::net::Ipv4Addr;

use ipnetwork::Ipv4Network;
use medlink_common::config::Config;
use medlink_common::error::GatewayError;
use medlink_common::hosts::{HostsEntry, HostsStatus};
use medlink_common::network::interface::{self, AdapterRules, NetworkInterface};
use medlink_common::network::route;
use medlink_common::system::SystemGateway;
use tracing::{debug, warn};

use crate::command::{CommandRunner, SystemRunner};
use crate::hosts::HostsFile;

pub struct WindowsGateway<R: CommandRunner = SystemRunner> {
    runner: R,
    rules: AdapterRules,
    hosts: HostsFile,
    hosts_entries: Vec<HostsEntry>,
    target_network: Ipv4Network,
    target_mtu: u32,
    route_destination: Ipv4Addr,
    route_mask: Ipv4Addr,
}

impl WindowsGateway<SystemRunner> {
    pub fn new(cfg: &Config) -> Self {
        Self::with_runner(cfg, SystemRunner)
    }
}

impl<R: CommandRunner> WindowsGateway<R> {
    pub fn with_runner(cfg: &Config, runner: R) -> Self {
        Self {
            runner,
            rules: cfg.adapter_rules.clone(),
            hosts: HostsFile::new(&cfg.hosts_file),
            hosts_entries: cfg.hosts_entries.clone(),
            target_network: cfg.target_network,
            target_mtu: cfg.target_mtu,
            route_destination: cfg.route_destination,
            route_mask: cfg.route_mask,
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Gateway of the current default route, if any.
    pub fn default_gateway(&self) -> Option<Ipv4Addr> {
        self.route_table()
            .ok()
            .and_then(|table| route::parse_default_gateway(&table))
    }

    /// Routing-table lines that mention the medical route destination.
    pub fn route_lines(&self) -> Result<Vec<String>, GatewayError> {
        let table = self.route_table()?;
        Ok(route::route_lines(&table, self.route_destination))
    }

    /// Sets `mtu` on every enumerated interface. A failure on one interface
    /// does not stop the others.
    pub fn set_all_mtu(&self, mtu: u32) -> Result<Vec<(String, Result<(), GatewayError>)>, GatewayError> {
        let interfaces = self.list_interfaces()?;
        Ok(interfaces
            .into_iter()
            .map(|iface| {
                let result = self.set_mtu(&iface.name, mtu);
                (iface.name, result)
            })
            .collect())
    }

    fn route_table(&self) -> Result<String, GatewayError> {
        Ok(self.runner.run("route", &["print", "-4"])?.stdout)
    }

    fn current_mtu(&self, iface: &str) -> Result<Option<u32>, GatewayError> {
        let output = self
            .runner
            .run("netsh", &["interface", "ipv4", "show", "interface", iface])?;
        Ok(interface::parse_mtu(&output.stdout))
    }
}

impl<R: CommandRunner> SystemGateway for WindowsGateway<R> {
    fn list_interfaces(&self) -> Result<Vec<NetworkInterface>, GatewayError> {
        let output = self.runner.run("ipconfig", &["/all"])?;
        let interfaces = interface::parse_interfaces(&output.stdout, &self.rules);
        debug!("ipconfig reported {} adapters", interfaces.len());
        Ok(interfaces)
    }

    fn is_elevated(&self) -> bool {
        is_root::is_root()
    }

    fn ip_already_set(&self, iface: &str) -> bool {
        match self.list_interfaces() {
            Ok(interfaces) => interfaces
                .iter()
                .any(|i| i.name == iface && i.within(&self.target_network)),
            Err(e) => {
                warn!("IP probe degraded to 'not set': {e}");
                false
            }
        }
    }

    fn mtu_already_set(&self, iface: &str) -> bool {
        match self.current_mtu(iface) {
            Ok(mtu) => mtu == Some(self.target_mtu),
            Err(e) => {
                warn!("MTU probe degraded to 'not set': {e}");
                false
            }
        }
    }

    fn route_already_set(&self) -> bool {
        match self.route_table() {
            Ok(table) => route::route_present(&table, self.route_destination),
            Err(e) => {
                warn!("route probe degraded to 'not set': {e}");
                false
            }
        }
    }

    fn hosts_status(&self) -> HostsStatus {
        self.hosts.status(&self.hosts_entries)
    }

    fn set_static_ip(&self, iface: &str, ip: &str, mask: &str) -> Result<(), GatewayError> {
        self.runner.run(
            "netsh",
            &["interface", "ipv4", "set", "address", iface, "static", ip, mask],
        )?;
        Ok(())
    }

    fn set_dns(&self, iface: &str, dns: &str) -> Result<(), GatewayError> {
        self.runner
            .run("netsh", &["interface", "ipv4", "set", "dns", iface, "static", dns])?;
        Ok(())
    }

    fn set_mtu(&self, iface: &str, mtu: u32) -> Result<(), GatewayError> {
        let mtu_arg = format!("mtu={mtu}");
        self.runner.run(
            "netsh",
            &["interface", "ipv4", "set", "subinterface", iface, &mtu_arg, "store=persistent"],
        )?;
        Ok(())
    }

    fn add_persistent_route(&self, gateway: &str) -> Result<(), GatewayError> {
        let destination = self.route_destination.to_string();
        let mask = self.route_mask.to_string();
        self.runner
            .run("route", &["-p", "add", &destination, "mask", &mask, gateway])?;
        Ok(())
    }

    fn append_hosts_entries(&self) -> Result<Vec<HostsEntry>, GatewayError> {
        self.hosts.append_missing(&self.hosts_entries)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
