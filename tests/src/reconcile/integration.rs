#![cfg(test)]
use std::net::Ipv4Addr;
use std::sync::Arc;

use medlink_common::error::{ApplyError, GatewayError};
use medlink_common::network::interface::NetworkInterface;
use medlink_common::system::ConfigItem;
use medlink_core::reconciler::{DesiredConfig, MissingSet, Progress, Reconciler};
use medlink_core::task::run_blocking;
use tokio::sync::mpsc;

use crate::fake::{Call, FakeGateway};

fn desired() -> DesiredConfig {
    DesiredConfig {
        interface: "Ethernet".into(),
        ip: "10.36.5.20".into(),
        subnet_mask: "255.255.255.0".into(),
        dns: "10.37.128.3".into(),
    }
}

fn reconciler(gateway: &Arc<FakeGateway>) -> Reconciler {
    Reconciler::new(gateway.clone(), 1300)
}

#[test]
fn fully_configured_machine_needs_nothing() {
    let gateway = Arc::new(FakeGateway::configured());
    let reconciler = reconciler(&gateway);

    let missing = reconciler.missing_items("Ethernet", false);
    assert!(missing.is_empty());

    let report = reconciler
        .apply_missing(&desired(), &missing, |_| panic!("no progress expected"))
        .unwrap();
    assert!(report.applied.is_empty());
    assert!(gateway.calls().is_empty(), "mutators must not run: {:?}", gateway.calls());
}

#[test]
fn force_reports_everything_in_order() {
    let gateway = Arc::new(FakeGateway::configured());
    let missing = reconciler(&gateway).missing_items("Ethernet", true);
    assert_eq!(
        missing.items(),
        &[ConfigItem::StaticIp, ConfigItem::Route, ConfigItem::Mtu, ConfigItem::HostsFile]
    );
}

#[test]
fn only_missing_items_are_applied() {
    let gateway = Arc::new(FakeGateway {
        ip_set: false,
        mtu_set: true,
        hosts_set: true,
        route_set: false,
        ..FakeGateway::new()
    });
    let reconciler = reconciler(&gateway);

    let missing = reconciler.missing_items("Ethernet", false);
    assert_eq!(missing.items(), &[ConfigItem::StaticIp, ConfigItem::Route]);

    let report = reconciler.apply_missing(&desired(), &missing, |_| {}).unwrap();
    assert_eq!(report.applied, vec![ConfigItem::StaticIp, ConfigItem::Route]);
    assert!(report.hosts_added.is_empty());
    assert_eq!(
        gateway.calls(),
        vec![
            Call::SetStaticIp {
                iface: "Ethernet".into(),
                ip: "10.36.5.20".into(),
                mask: "255.255.255.0".into(),
            },
            Call::SetDns {
                iface: "Ethernet".into(),
                dns: "10.37.128.3".into(),
            },
            Call::AddRoute {
                gateway: "10.36.5.1".into(),
            },
        ]
    );
}

#[test]
fn failing_step_stops_the_run_and_keeps_the_error() {
    let gateway = Arc::new(FakeGateway {
        fail_on: Some("add_persistent_route"),
        ..FakeGateway::new()
    });
    let reconciler = reconciler(&gateway);
    let mut progress: Vec<Progress> = Vec::new();

    let err = reconciler
        .apply_missing(&desired(), &MissingSet::all(), |p| progress.push(p))
        .unwrap_err();

    match err {
        ApplyError::Step {
            step,
            completed,
            source,
        } => {
            assert_eq!(step, ConfigItem::Route);
            assert_eq!(completed, vec![ConfigItem::StaticIp]);
            match source {
                GatewayError::CommandFailed { command, output, .. } => {
                    assert_eq!(command, "fake add_persistent_route");
                    assert_eq!(output, "The requested operation requires elevation.");
                }
                other => panic!("error was rewrapped: {other:?}"),
            }
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let names: Vec<Call> = gateway.calls();
    assert_eq!(names.len(), 3, "MTU and hosts must not run: {names:?}");
    assert_eq!(progress.len(), 1);
    assert_eq!(progress[0].current, 1);
}

#[test]
fn failure_message_names_the_step() {
    let gateway = Arc::new(FakeGateway {
        fail_on: Some("set_mtu"),
        ..FakeGateway::new()
    });
    let err = reconciler(&gateway)
        .apply_missing(&desired(), &MissingSet::all(), |_| {})
        .unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("MTU failed"), "{message}");
    assert!(message.contains("fake set_mtu"), "{message}");
}

#[test]
fn unprivileged_run_changes_nothing() {
    let gateway = Arc::new(FakeGateway {
        elevated: false,
        ..FakeGateway::new()
    });
    let err = reconciler(&gateway)
        .apply_missing(&desired(), &MissingSet::all(), |_| {})
        .unwrap_err();

    assert!(matches!(err, ApplyError::InsufficientPrivilege));
    assert!(gateway.calls().is_empty());
}

#[test]
fn progress_reports_each_step() {
    let gateway = Arc::new(FakeGateway::new());
    let mut progress: Vec<Progress> = Vec::new();

    let report = reconciler(&gateway)
        .apply_missing(&desired(), &MissingSet::all(), |p| progress.push(p))
        .unwrap();

    assert_eq!(report.applied.len(), 4);
    assert_eq!(report.hosts_added.len(), 4);
    let percents: Vec<u8> = progress.iter().map(Progress::percent).collect();
    assert_eq!(percents, vec![25, 50, 75, 100]);
    assert_eq!(progress[0].message, "Configuring IP address...");
    assert_eq!(progress[3].message, "Updating hosts file...");
    assert!(progress.iter().all(|p| p.total == 4));
}

#[test]
fn mtu_step_uses_target_mtu() {
    let gateway = Arc::new(FakeGateway {
        ip_set: true,
        route_set: true,
        hosts_set: true,
        ..FakeGateway::new()
    });
    let (missing, _report) = Reconciler::new(gateway.clone(), 1400)
        .reconcile(&desired(), false, |_| {})
        .unwrap();

    assert_eq!(missing.items(), &[ConfigItem::Mtu]);
    assert_eq!(
        gateway.calls(),
        vec![Call::SetMtu {
            iface: "Ethernet".into(),
            mtu: 1400,
        }]
    );
}

#[test]
fn reconcile_is_idempotent_once_configured() {
    let gateway = Arc::new(FakeGateway::configured());
    let (missing, report) = reconciler(&gateway)
        .reconcile(&desired(), false, |_| {})
        .unwrap();
    assert!(missing.is_empty());
    assert!(report.applied.is_empty());
    assert!(gateway.calls().is_empty());
}

#[test]
fn verify_reports_fresh_probe_results() {
    let gateway = Arc::new(FakeGateway {
        ip_set: true,
        mtu_set: true,
        interfaces: vec![
            NetworkInterface::new("Wi-Fi", Some(Ipv4Addr::new(192, 168, 1, 4))),
            NetworkInterface::new("Ethernet", Some(Ipv4Addr::new(10, 36, 5, 20))),
        ],
        ..FakeGateway::new()
    });

    let verification = reconciler(&gateway).verify("Ethernet");
    assert_eq!(verification.ipv4, Some(Ipv4Addr::new(10, 36, 5, 20)));
    assert!(verification.ip_set && verification.mtu_set);
    assert!(!verification.route_set && !verification.hosts_set);
    assert_eq!(
        verification.missing().items(),
        &[ConfigItem::Route, ConfigItem::HostsFile]
    );
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn progress_streams_back_from_a_blocking_worker() {
    let gateway = Arc::new(FakeGateway {
        mtu_set: true,
        ..FakeGateway::new()
    });
    let reconciler = reconciler(&gateway);
    let (tx, mut rx) = mpsc::unbounded_channel::<Progress>();

    let worker = run_blocking(None, move || {
        reconciler.reconcile(&desired(), false, |step| {
            let _ = tx.send(step);
        })
    });
    let drain = async {
        let mut seen: Vec<Progress> = Vec::new();
        while let Some(step) = rx.recv().await {
            seen.push(step);
        }
        seen
    };

    let (outcome, seen) = tokio::join!(worker, drain);
    let (missing, report) = outcome.unwrap().unwrap();

    assert_eq!(missing.len(), 3);
    assert_eq!(report.applied, missing.items().to_vec());
    let currents: Vec<usize> = seen.iter().map(|p| p.current).collect();
    assert_eq!(currents, vec![1, 2, 3]);
    assert_eq!(seen.last().map(Progress::percent), Some(100));
}
