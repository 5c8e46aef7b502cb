use std::sync::Arc;

use medlink_common::config::Config;
use medlink_common::error::ApplyError;
use medlink_common::hosts::{HostsEntry, HostsStatus};
use medlink_common::system::SystemGateway;
use medlink_core::system::WindowsGateway;
use medlink_core::task::run_blocking;
use tracing::{info, warn};

use crate::terminal::{format, print};

pub async fn hosts(check_only: bool, cfg: &Config) -> anyhow::Result<()> {
    let gateway = Arc::new(WindowsGateway::new(cfg));

    let status: HostsStatus = {
        let gateway = gateway.clone();
        run_blocking(Some(cfg.probe_timeout), move || gateway.hosts_status()).await?
    };

    print::print_status(cfg.hosts_file.display().to_string());
    let key_width: usize = cfg
        .hosts_entries
        .iter()
        .map(|entry| entry.domain.len())
        .max()
        .unwrap_or(0);
    for entry in &status.existing {
        print::aligned_line(&entry.domain, format::state(true), key_width);
    }
    for entry in &status.missing {
        print::aligned_line(&entry.domain, format::state(false), key_width);
    }

    if status.is_complete() {
        info!("hosts file already carries every medical entry");
        return Ok(());
    }
    if check_only {
        warn!("{} entr(ies) missing", status.missing.len());
        return Ok(());
    }
    if !gateway.is_elevated() {
        return Err(ApplyError::InsufficientPrivilege.into());
    }

    let added: Vec<HostsEntry> =
        run_blocking(Some(cfg.probe_timeout), move || gateway.append_hosts_entries()).await??;
    for entry in &added {
        print::print_status(format!("hosts += {entry}"));
    }
    info!("added {} entr(ies) to {}", added.len(), cfg.hosts_file.display());
    Ok(())
}
