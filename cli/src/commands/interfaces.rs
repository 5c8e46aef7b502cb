use std::time::Instant;

use colored::*;
use medlink_common::config::Config;
use medlink_common::network::interface::NetworkInterface;
use medlink_common::system::SystemGateway;
use medlink_core::system::WindowsGateway;
use medlink_core::task::run_blocking;
use tracing::warn;

use crate::{mprint, terminal::{colors, format, print, progress}};

pub async fn interfaces(cfg: &Config) -> anyhow::Result<()> {
    let spinner = progress::spinner("Reading adapters...");
    let start_time: Instant = Instant::now();
    let gateway = WindowsGateway::new(cfg);
    let interfaces: Vec<NetworkInterface> =
        run_blocking(Some(cfg.probe_timeout), move || gateway.list_interfaces()).await??;
    drop(spinner);

    if interfaces.is_empty() {
        warn!("ipconfig listed no adapters");
        return Ok(());
    }

    for (idx, iface) in interfaces.iter().enumerate() {
        match cfg.quiet {
            2 => print::print_status(&iface.name),
            _ => {
                print::tree_head(idx, &iface.name);
                print::as_tree_one_level(format::interface_details(iface, &cfg.target_network));
            }
        }
        if idx + 1 != interfaces.len() && cfg.quiet < 2 {
            mprint!();
        }
    }

    let on_target = interfaces
        .iter()
        .filter(|iface| iface.within(&cfg.target_network))
        .count();
    let summary: ColoredString = format!(
        "{} adapters, {} inside {} ({:.2}s)",
        interfaces.len(),
        on_target,
        cfg.target_network,
        start_time.elapsed().as_secs_f64()
    )
    .color(colors::TEXT_DEFAULT);

    if cfg.quiet == 0 {
        print::fat_separator();
        print::centerln(&summary);
    }
    Ok(())
}
