use std::sync::Arc;

use medlink_common::config::Config;
use medlink_core::check::NetworkCheck;
use medlink_core::network::SystemReachability;
use medlink_core::reconciler::{Reconciler, Verification};
use medlink_core::system::WindowsGateway;
use medlink_core::task::run_blocking;
use tracing::{info, warn};

use crate::{mprint, terminal::{format, print, progress}};

pub async fn verify(interface: String, cfg: &Config) -> anyhow::Result<()> {
    let spinner = progress::spinner("Verifying configuration...");
    let reconciler = Reconciler::new(Arc::new(WindowsGateway::new(cfg)), cfg.target_mtu);
    let verification: Verification =
        run_blocking(Some(cfg.probe_timeout), move || reconciler.verify(&interface)).await?;
    drop(spinner);

    print_verification(&verification);
    mprint!();

    print::header("service reachability", cfg.quiet);
    let check = NetworkCheck::new(
        Box::new(SystemReachability::new(cfg.command_timeout, cfg.connect_timeout)),
        cfg,
    );
    let services = check.services().await;
    let key_width: usize = services.iter().map(|s| s.host.len()).max().unwrap_or(0);
    for service in &services {
        print::aligned_line(&service.host, format::reachable(service.reachable), key_width);
    }

    if verification.is_complete() && services.iter().all(|s| s.reachable) {
        info!("{} is ready for the medical network", verification.interface);
    } else {
        warn!("{} is not fully configured", verification.interface);
    }
    Ok(())
}

pub fn print_verification(verification: &Verification) {
    print::tree_head(0, &verification.interface);
    print::as_tree_one_level(format::verification_details(verification));
}
