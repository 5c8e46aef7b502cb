//! Reachability of the medical network from this machine.

use async_trait::async_trait;
use medlink_common::network::ping::PingSummary;

pub mod ping;
pub mod tcp;

/// What a ping run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingOutcome {
    pub replied: bool,
    pub summary: Option<PingSummary>,
    /// Human-readable reason, e.g. the summary or why the ping failed.
    pub detail: String,
}

#[async_trait]
pub trait Reachability: Send + Sync {
    async fn ping(&self, host: &str, count: u32) -> PingOutcome;
    async fn connect(&self, host: &str, port: u16) -> bool;
}

/// Uses the system `ping` and plain TCP connects.
pub struct SystemReachability {
    command_timeout: std::time::Duration,
    connect_timeout: std::time::Duration,
}

impl SystemReachability {
    pub fn new(command_timeout: std::time::Duration, connect_timeout: std::time::Duration) -> Self {
        Self {
            command_timeout,
            connect_timeout,
        }
    }
}

#[async_trait]
impl Reachability for SystemReachability {
    async fn ping(&self, host: &str, count: u32) -> PingOutcome {
        ping::ping_host(host, count, self.command_timeout).await
    }

    async fn connect(&self, host: &str, port: u16) -> bool {
        tcp::connect_probe(host, port, self.connect_timeout).await
    }
}
