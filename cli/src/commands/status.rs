use std::sync::Arc;

use medlink_common::config::Config;
use medlink_common::system::ConfigItem;
use medlink_core::reconciler::{MissingSet, Reconciler};
use medlink_core::system::WindowsGateway;
use medlink_core::task::run_blocking;
use tracing::{info, warn};

use crate::terminal::{format, print, progress};

pub async fn status(interface: String, cfg: &Config) -> anyhow::Result<()> {
    let spinner = progress::spinner("Probing current configuration...");
    let reconciler = Reconciler::new(Arc::new(WindowsGateway::new(cfg)), cfg.target_mtu);
    let probed = interface.clone();
    let missing: MissingSet = run_blocking(Some(cfg.probe_timeout), move || {
        reconciler.missing_items(&probed, false)
    })
    .await?;
    drop(spinner);

    let key_width: usize = ConfigItem::ALL
        .iter()
        .map(|item| item.label().len())
        .max()
        .unwrap_or(0);
    for item in ConfigItem::ALL {
        print::aligned_line(item.label(), format::state(!missing.contains(item)), key_width);
    }

    if missing.is_empty() {
        info!("{interface} already matches the medical network configuration");
    } else {
        warn!(
            "{} item(s) missing on {interface}: {}",
            missing.len(),
            format::item_list(missing.items())
        );
    }
    Ok(())
}
