pub mod apply;
pub mod check;
pub mod hosts;
pub mod interfaces;
pub mod mtu;
pub mod status;
pub mod verify;

use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use ipnetwork::Ipv4Network;
use medlink_common::config::Config;
use medlink_common::network::interface::{AdapterRules, DEFAULT_HEADER_PATTERN, DEFAULT_IPV4_PATTERN};

#[derive(Parser)]
#[command(name = "medlink")]
#[command(about = "Configures this machine for the medical insurance network.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Network whose addresses count as an already configured static IP
    #[arg(long, global = true)]
    pub network: Option<Ipv4Network>,

    /// MTU to expect and to set
    #[arg(long, global = true)]
    pub mtu: Option<u32>,

    /// Hosts file to inspect and extend
    #[arg(long, global = true)]
    pub hosts_file: Option<PathBuf>,

    /// Regex for adapter headers in `ipconfig /all`; needs a `name` group
    #[arg(long, global = true)]
    pub adapter_pattern: Option<String>,

    /// Regex for IPv4 fields in `ipconfig /all`; needs an `addr` group
    #[arg(long, global = true)]
    pub ipv4_pattern: Option<String>,

    /// Print less; repeat for even less
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub quiet: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List network adapters and their IPv4 addresses
    #[command(alias = "i")]
    Interfaces,
    /// Show which configuration items are missing on an interface
    #[command(alias = "s")]
    Status { interface: String },
    /// Apply the missing configuration items to an interface
    #[command(alias = "a")]
    Apply {
        interface: String,
        /// Static IPv4 address to assign
        #[arg(long)]
        ip: String,
        /// Subnet mask, defaults to 255.255.255.0
        #[arg(long)]
        mask: Option<String>,
        /// DNS server, defaults to 10.37.128.3
        #[arg(long)]
        dns: Option<String>,
        /// Apply every item even if it already looks configured
        #[arg(long)]
        force: bool,
    },
    /// Inspect the hosts file and add the missing medical entries
    #[command(alias = "h")]
    Hosts {
        /// Only report, never write
        #[arg(long)]
        check: bool,
    },
    /// Re-probe an interface and test the service hosts
    #[command(alias = "v")]
    Verify { interface: String },
    /// Ping the medical gateway, test services and look for the security agent
    #[command(alias = "c")]
    Check,
    /// Set the MTU on every adapter and show the medical route
    MtuAll,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn config(&self) -> anyhow::Result<Config> {
        let mut cfg = Config {
            quiet: self.quiet,
            ..Config::default()
        };
        if let Some(network) = self.network {
            cfg.target_network = network;
        }
        if let Some(mtu) = self.mtu {
            cfg.target_mtu = mtu;
        }
        if let Some(path) = &self.hosts_file {
            cfg.hosts_file = path.clone();
        }
        if self.adapter_pattern.is_some() || self.ipv4_pattern.is_some() {
            let header = self.adapter_pattern.as_deref().unwrap_or(DEFAULT_HEADER_PATTERN);
            let ipv4 = self.ipv4_pattern.as_deref().unwrap_or(DEFAULT_IPV4_PATTERN);
            cfg.adapter_rules =
                AdapterRules::new(header, ipv4).context("invalid ipconfig parsing pattern")?;
        }
        Ok(cfg)
    }
}
