//! # Medical Network Check
//!
//! Answers "can this machine reach the medical network right now?".
//!
//! Runs independently of the reconciler: it pings the medical gateway, opens
//! a TCP connection to each service host and looks for the security agent.

use std::net::Ipv4Addr;
use std::path::PathBuf;

use medlink_common::config::Config;

use crate::network::{PingOutcome, Reachability};

const PING_COUNT: u32 = 4;
const SERVICE_PORT: u16 = 80;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceStatus {
    pub host: String,
    pub reachable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkReport {
    pub gateway: Ipv4Addr,
    pub ping: PingOutcome,
    pub services: Vec<ServiceStatus>,
    pub agent_path: PathBuf,
    pub agent_installed: bool,
}

impl NetworkReport {
    pub fn all_ok(&self) -> bool {
        self.ping.replied && self.services.iter().all(|s| s.reachable) && self.agent_installed
    }
}

pub struct NetworkCheck {
    reachability: Box<dyn Reachability>,
    gateway: Ipv4Addr,
    service_hosts: Vec<String>,
    security_agent: PathBuf,
}

impl NetworkCheck {
    pub fn new(reachability: Box<dyn Reachability>, cfg: &Config) -> Self {
        Self {
            reachability,
            gateway: cfg.medical_gateway,
            service_hosts: cfg.service_hosts.clone(),
            security_agent: cfg.security_agent.clone(),
        }
    }

    /// Port-80 reachability of every service host, in configured order.
    pub async fn services(&self) -> Vec<ServiceStatus> {
        let mut statuses = Vec::with_capacity(self.service_hosts.len());
        for host in &self.service_hosts {
            let reachable = self.reachability.connect(host, SERVICE_PORT).await;
            statuses.push(ServiceStatus {
                host: host.clone(),
                reachable,
            });
        }
        statuses
    }

    pub async fn run(&self) -> NetworkReport {
        let ping = self
            .reachability
            .ping(&self.gateway.to_string(), PING_COUNT)
            .await;
        let services = self.services().await;

        NetworkReport {
            gateway: self.gateway,
            ping,
            services,
            agent_path: self.security_agent.clone(),
            agent_installed: self.security_agent.exists(),
        }
    }
}
