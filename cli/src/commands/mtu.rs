use std::sync::Arc;

use medlink_common::config::Config;
use medlink_common::error::{ApplyError, GatewayError};
use medlink_common::system::SystemGateway;
use medlink_core::system::WindowsGateway;
use medlink_core::task::run_blocking;
use tracing::{error, info, warn};

use crate::{mprint, terminal::{format, print}};

pub async fn mtu_all(cfg: &Config) -> anyhow::Result<()> {
    let gateway = Arc::new(WindowsGateway::new(cfg));
    if !gateway.is_elevated() {
        return Err(ApplyError::InsufficientPrivilege.into());
    }

    let mtu: u32 = cfg.target_mtu;
    let results: Vec<(String, Result<(), GatewayError>)> = {
        let gateway = gateway.clone();
        run_blocking(None, move || gateway.set_all_mtu(mtu)).await??
    };

    let failed = results.iter().filter(|(_, result)| result.is_err()).count();
    let key_width: usize = results.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, result) in &results {
        print::aligned_line(name, format::state(result.is_ok()), key_width);
        if let Err(e) = result {
            error!("{e}");
        }
    }

    if failed == 0 {
        info!("MTU {mtu} set on {} interface(s)", results.len());
    } else {
        warn!("MTU {mtu} failed on {failed} of {} interface(s)", results.len());
    }

    mprint!();
    print::header("medical route", cfg.quiet);
    let lines: Vec<String> = run_blocking(Some(cfg.probe_timeout), move || gateway.route_lines()).await??;
    if lines.is_empty() {
        warn!("no route to {} in the routing table", cfg.route_destination);
    }
    for line in &lines {
        print::print_status(line);
    }
    Ok(())
}
