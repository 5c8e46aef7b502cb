use colored::*;
use medlink_common::config::Config;
use medlink_core::check::{NetworkCheck, NetworkReport};
use medlink_core::network::SystemReachability;
use tracing::{info, warn};

use crate::terminal::{colors, format, print, progress};

pub async fn check(cfg: &Config) -> anyhow::Result<()> {
    let spinner = progress::spinner("Checking the medical network...");
    let check = NetworkCheck::new(
        Box::new(SystemReachability::new(cfg.command_timeout, cfg.connect_timeout)),
        cfg,
    );
    let report: NetworkReport = check.run().await;
    drop(spinner);

    print_report(&report);

    if report.all_ok() {
        info!("medical network is reachable");
    } else {
        warn!("medical network check found problems");
    }
    Ok(())
}

fn print_report(report: &NetworkReport) {
    let gateway: ColoredString = format!(
        "{} ({})",
        format::reachable(report.ping.replied),
        report.ping.detail
    )
    .color(colors::TEXT_DEFAULT);

    let mut details: Vec<(String, ColoredString)> =
        vec![(format!("ping {}", report.gateway), gateway)];
    details.extend(
        report
            .services
            .iter()
            .map(|service| (service.host.clone(), format::reachable(service.reachable))),
    );
    let agent: ColoredString = if report.agent_installed {
        "installed".color(colors::GOOD)
    } else {
        "not found".color(colors::BAD)
    };
    details.push((String::from("security agent"), agent));

    print::tree_head(0, "medical network");
    print::as_tree_one_level(details);
    print::print_status(report.agent_path.display().to_string());
}
