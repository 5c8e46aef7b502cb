use std::sync::Arc;

use medlink_common::config::Config;
use medlink_common::error::ApplyError;
use medlink_core::reconciler::{DesiredConfig, Progress, Reconciler, Verification};
use medlink_core::system::WindowsGateway;
use medlink_core::task::run_blocking;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::commands::verify::print_verification;
use crate::{mprint, terminal::{format, print, progress::ApplyProgress}};

pub struct ApplyArgs {
    pub interface: String,
    pub ip: String,
    pub mask: Option<String>,
    pub dns: Option<String>,
    pub force: bool,
}

impl ApplyArgs {
    fn desired(self, cfg: &Config) -> (DesiredConfig, bool) {
        let desired = DesiredConfig {
            interface: self.interface,
            ip: self.ip,
            subnet_mask: self.mask.unwrap_or_else(|| cfg.default_mask.to_string()),
            dns: self.dns.unwrap_or_else(|| cfg.default_dns.to_string()),
        };
        (desired, self.force)
    }
}

pub async fn apply(args: ApplyArgs, cfg: &Config) -> anyhow::Result<()> {
    let (desired, force) = args.desired(cfg);
    let reconciler = Arc::new(Reconciler::new(
        Arc::new(WindowsGateway::new(cfg)),
        cfg.target_mtu,
    ));

    let bar = ApplyProgress::start(&desired.interface);
    let (tx, mut rx) = mpsc::unbounded_channel::<Progress>();

    let worker = {
        let reconciler = reconciler.clone();
        let desired = desired.clone();
        run_blocking(None, move || {
            reconciler.reconcile(&desired, force, |step| {
                forward_progress(&tx, step);
            })
        })
    };
    // The sender lives in the worker closure, so the drain ends with it.
    let drain = async {
        while let Some(step) = rx.recv().await {
            bar.update(step);
        }
    };

    let (outcome, ()) = tokio::join!(worker, drain);
    drop(bar);

    let (missing, report) = match outcome? {
        Ok(done) => done,
        Err(e) => {
            if let ApplyError::Step { completed, .. } = &e {
                if !completed.is_empty() {
                    warn!("applied before the failure: {}", format::item_list(completed));
                }
            }
            return Err(e.into());
        }
    };

    if missing.is_empty() {
        info!("{} already configured, nothing applied", desired.interface);
    } else {
        info!("applied: {}", format::item_list(&report.applied));
    }
    for entry in &report.hosts_added {
        print::print_status(format!("hosts += {entry}"));
    }

    mprint!();
    print::header("verification", cfg.quiet);
    let interface = desired.interface;
    let verification: Verification =
        run_blocking(Some(cfg.probe_timeout), move || reconciler.verify(&interface)).await?;
    print_verification(&verification);

    if !verification.is_complete() {
        warn!(
            "still missing after apply: {}",
            format::item_list(verification.missing().items())
        );
    }
    Ok(())
}

/// Hands a progress report to the driving task. Returns `false` once nobody
/// is listening any more.
fn forward_progress(tx: &mpsc::UnboundedSender<Progress>, step: Progress) -> bool {
    match tx.send(step) {
        Ok(()) => true,
        Err(unsent) => {
            debug!("progress receiver gone, dropped {:?}", unsent.0);
            false
        }
    }
}
