use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::time::Duration;

use ipnetwork::Ipv4Network;

use crate::hosts::HostsEntry;
use crate::network::interface::AdapterRules;

pub const DEFAULT_HOSTS_FILE: &str = r"C:\Windows\System32\drivers\etc\hosts";
pub const DEFAULT_SECURITY_AGENT: &str = r"C:\Windows\SysWOW64\IsAgent";

#[derive(Debug, Clone)]
pub struct Config {
    /// Addresses inside this network count as "static IP already set".
    pub target_network: Ipv4Network,
    /// MTU every configured interface is expected to carry.
    pub target_mtu: u32,
    /// Destination of the persistent route added through the derived gateway.
    pub route_destination: Ipv4Addr,
    pub route_mask: Ipv4Addr,
    /// Pre-filled subnet mask for the static address.
    pub default_mask: Ipv4Addr,
    /// Pre-filled DNS server for the static address.
    pub default_dns: Ipv4Addr,
    /// Pinged by the network check.
    pub medical_gateway: Ipv4Addr,
    pub hosts_file: PathBuf,
    /// How adapter headers and IPv4 fields are recognised in `ipconfig /all`.
    pub adapter_rules: AdapterRules,
    pub hosts_entries: Vec<HostsEntry>,
    /// Domains probed on port 80 after configuration.
    pub service_hosts: Vec<String>,
    /// Presence of this path means the security agent is installed.
    pub security_agent: PathBuf,
    pub command_timeout: Duration,
    pub connect_timeout: Duration,
    /// Upper bound on a whole read-only probe pass.
    pub probe_timeout: Duration,
    /// Terminal verbosity. 0 prints everything, higher values print less.
    pub quiet: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_network: Ipv4Network::new(Ipv4Addr::new(10, 36, 0, 0), 16)
                .unwrap_or_else(|_| Ipv4Network::from(Ipv4Addr::new(10, 36, 0, 0))),
            target_mtu: 1300,
            route_destination: Ipv4Addr::new(10, 0, 0, 0),
            route_mask: Ipv4Addr::new(255, 0, 0, 0),
            default_mask: Ipv4Addr::new(255, 255, 255, 0),
            default_dns: Ipv4Addr::new(10, 37, 128, 3),
            medical_gateway: Ipv4Addr::new(10, 35, 128, 1),
            hosts_file: PathBuf::from(DEFAULT_HOSTS_FILE),
            adapter_rules: AdapterRules::default(),
            hosts_entries: vec![
                HostsEntry::new(Ipv4Addr::new(10, 37, 224, 243), "hisips.shx.hsip.gov.cn"),
                HostsEntry::new(Ipv4Addr::new(10, 37, 225, 216), "fms.shx.hsip.gov.cn"),
                HostsEntry::new(Ipv4Addr::new(10, 37, 231, 230), "cts-svc.shx.hsip.gov.cn"),
                HostsEntry::new(Ipv4Addr::new(10, 37, 227, 210), "zfzg.shx.hsip.gov.cn"),
            ],
            service_hosts: vec![
                "hisips.shx.hsip.gov.cn".to_string(),
                "fms.shx.hsip.gov.cn".to_string(),
                "cts-svc.shx.hsip.gov.cn".to_string(),
            ],
            security_agent: PathBuf::from(DEFAULT_SECURITY_AGENT),
            command_timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
            probe_timeout: Duration::from_secs(30),
            quiet: 0,
        }
    }
}
