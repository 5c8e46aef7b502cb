//! # Reconciler
//!
//! Decides which parts of the target configuration are missing on an
//! interface and applies only those, in the fixed order
//! IP → route → MTU → hosts. Every decision is re-derived from live state, so
//! re-running after a failure only redoes what is still missing.

use std::net::Ipv4Addr;
use std::sync::Arc;

use medlink_common::error::ApplyError;
use medlink_common::hosts::HostsEntry;
use medlink_common::network::route::derive_gateway;
use medlink_common::system::{ConfigItem, SystemGateway};
use tracing::{info, warn};

/// Values the user supplies for the interface being configured. Validation is
/// left to the OS commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredConfig {
    pub interface: String,
    pub ip: String,
    pub subnet_mask: String,
    pub dns: String,
}

/// Missing configuration items, always in canonical apply order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MissingSet(Vec<ConfigItem>);

impl MissingSet {
    pub fn all() -> Self {
        Self(ConfigItem::ALL.to_vec())
    }

    pub fn contains(&self, item: ConfigItem) -> bool {
        self.0.contains(&item)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn items(&self) -> &[ConfigItem] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = ConfigItem> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<ConfigItem> for MissingSet {
    fn from_iter<I: IntoIterator<Item = ConfigItem>>(iter: I) -> Self {
        let mut items: Vec<ConfigItem> = iter.into_iter().collect();
        items.sort();
        items.dedup();
        Self(items)
    }
}

/// Reported after each completed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
    pub message: &'static str,
}

impl Progress {
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        ((self.current * 100) / self.total) as u8
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub applied: Vec<ConfigItem>,
    pub hosts_added: Vec<HostsEntry>,
}

/// Fresh probe results for one interface, as shown after configuring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    pub interface: String,
    pub ipv4: Option<Ipv4Addr>,
    pub ip_set: bool,
    pub route_set: bool,
    pub mtu_set: bool,
    pub hosts_set: bool,
}

impl Verification {
    pub fn is_set(&self, item: ConfigItem) -> bool {
        match item {
            ConfigItem::StaticIp => self.ip_set,
            ConfigItem::Route => self.route_set,
            ConfigItem::Mtu => self.mtu_set,
            ConfigItem::HostsFile => self.hosts_set,
        }
    }

    pub fn missing(&self) -> MissingSet {
        ConfigItem::ALL
            .into_iter()
            .filter(|item| !self.is_set(*item))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }
}

pub struct Reconciler {
    gateway: Arc<dyn SystemGateway>,
    target_mtu: u32,
}

impl Reconciler {
    pub fn new(gateway: Arc<dyn SystemGateway>, target_mtu: u32) -> Self {
        Self {
            gateway,
            target_mtu,
        }
    }

    pub fn gateway(&self) -> &Arc<dyn SystemGateway> {
        &self.gateway
    }

    /// Probes the interface and returns what is not yet configured. `force`
    /// skips probing and reports everything as missing.
    pub fn missing_items(&self, iface: &str, force: bool) -> MissingSet {
        if force {
            return MissingSet::all();
        }

        ConfigItem::ALL
            .into_iter()
            .filter(|item| !self.probe(iface, *item))
            .collect()
    }

    /// Runs the mutators for `missing`, one step per item, strictly in order.
    ///
    /// Elevation is checked once before anything runs. The first failing step
    /// stops the run; earlier steps stay applied and the gateway's error is
    /// returned untouched inside [`ApplyError::Step`].
    pub fn apply_missing<F>(
        &self,
        desired: &DesiredConfig,
        missing: &MissingSet,
        mut progress: F,
    ) -> Result<ApplyReport, ApplyError>
    where
        F: FnMut(Progress),
    {
        let mut report = ApplyReport::default();
        if missing.is_empty() {
            return Ok(report);
        }

        if !self.gateway.is_elevated() {
            return Err(ApplyError::InsufficientPrivilege);
        }

        let total: usize = missing.len();
        for (idx, step) in missing.iter().enumerate() {
            let outcome = match step {
                ConfigItem::StaticIp => self
                    .gateway
                    .set_static_ip(&desired.interface, &desired.ip, &desired.subnet_mask)
                    .and_then(|()| self.gateway.set_dns(&desired.interface, &desired.dns)),
                ConfigItem::Route => self
                    .gateway
                    .add_persistent_route(&derive_gateway(&desired.ip)),
                ConfigItem::Mtu => self.gateway.set_mtu(&desired.interface, self.target_mtu),
                ConfigItem::HostsFile => self
                    .gateway
                    .append_hosts_entries()
                    .map(|added| report.hosts_added = added),
            };

            if let Err(source) = outcome {
                warn!("{step} failed after {} completed step(s)", report.applied.len());
                return Err(ApplyError::Step {
                    step,
                    completed: report.applied,
                    source,
                });
            }

            info!("{step} applied on {}", desired.interface);
            report.applied.push(step);
            progress(Progress {
                current: idx + 1,
                total,
                message: step.progress_message(),
            });
        }

        Ok(report)
    }

    /// Probe, then apply only the gaps (or everything when `force` is set).
    pub fn reconcile<F>(
        &self,
        desired: &DesiredConfig,
        force: bool,
        progress: F,
    ) -> Result<(MissingSet, ApplyReport), ApplyError>
    where
        F: FnMut(Progress),
    {
        let missing = self.missing_items(&desired.interface, force);
        info!(
            "{} item(s) to apply on {}",
            missing.len(),
            desired.interface
        );
        let report = self.apply_missing(desired, &missing, progress)?;
        Ok((missing, report))
    }

    pub fn verify(&self, iface: &str) -> Verification {
        let ipv4 = self
            .gateway
            .list_interfaces()
            .ok()
            .and_then(|interfaces| interfaces.into_iter().find(|i| i.name == iface))
            .and_then(|i| i.ipv4);

        Verification {
            interface: iface.to_string(),
            ipv4,
            ip_set: self.probe(iface, ConfigItem::StaticIp),
            route_set: self.probe(iface, ConfigItem::Route),
            mtu_set: self.probe(iface, ConfigItem::Mtu),
            hosts_set: self.probe(iface, ConfigItem::HostsFile),
        }
    }

    fn probe(&self, iface: &str, item: ConfigItem) -> bool {
        match item {
            ConfigItem::StaticIp => self.gateway.ip_already_set(iface),
            ConfigItem::Route => self.gateway.route_already_set(),
            ConfigItem::Mtu => self.gateway.mtu_already_set(iface),
            ConfigItem::HostsFile => self.gateway.hosts_already_set(),
        }
    }
}
