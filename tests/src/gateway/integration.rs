#![cfg(test)]
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use medlink_common::config::Config;
use medlink_common::error::GatewayError;
use medlink_common::hosts::{HOSTS_MARKER, HostsEntry, HostsStatus};
use medlink_common::network::interface::NetworkInterface;
use medlink_common::system::{ConfigItem, SystemGateway};
use medlink_core::command::{CommandOutput, CommandRunner, command_line};
use medlink_core::reconciler::{DesiredConfig, Reconciler};
use medlink_core::system::WindowsGateway;
use tempfile::TempDir;

const IPCONFIG: &str = "
Windows IP Configuration

Ethernet adapter 以太网:

   Connection-specific DNS Suffix  . :
   IPv4 Address. . . . . . . . . . . : 192.168.10.44(Preferred)

Wireless LAN adapter Wi-Fi:

   Media State . . . . . . . . . . . : Media disconnected
";

const ROUTE_PRINT: &str = "
IPv4 Route Table
===========================================================================
Active Routes:
Network Destination        Netmask          Gateway       Interface  Metric
          0.0.0.0          0.0.0.0      192.168.10.1    192.168.10.44     25
";

/// Shared command log, kept outside the gateway so the test can read it after
/// handing the runner over.
#[derive(Clone, Default)]
struct Recorder {
    script: Arc<HashMap<String, String>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    fn with_script(script: &[(&str, &str)]) -> Self {
        Self {
            script: Arc::new(
                script
                    .iter()
                    .map(|(line, out)| (line.to_string(), out.to_string()))
                    .collect(),
            ),
            calls: Arc::default(),
        }
    }

    fn mutations(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|line| !line.starts_with("ipconfig") && !line.contains(" show ") && !line.starts_with("route print"))
            .cloned()
            .collect()
    }
}

impl CommandRunner for Recorder {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, GatewayError> {
        let line = command_line(program, args);
        self.calls.lock().unwrap().push(line.clone());
        Ok(CommandOutput {
            stdout: self.script.get(&line).cloned().unwrap_or_default(),
            stderr: String::new(),
        })
    }
}

/// Runs as if the process had administrator rights.
struct Elevated<G>(G);

impl<G: SystemGateway> SystemGateway for Elevated<G> {
    fn list_interfaces(&self) -> Result<Vec<NetworkInterface>, GatewayError> {
        self.0.list_interfaces()
    }
    fn is_elevated(&self) -> bool {
        true
    }
    fn ip_already_set(&self, iface: &str) -> bool {
        self.0.ip_already_set(iface)
    }
    fn mtu_already_set(&self, iface: &str) -> bool {
        self.0.mtu_already_set(iface)
    }
    fn route_already_set(&self) -> bool {
        self.0.route_already_set()
    }
    fn hosts_status(&self) -> HostsStatus {
        self.0.hosts_status()
    }
    fn set_static_ip(&self, iface: &str, ip: &str, mask: &str) -> Result<(), GatewayError> {
        self.0.set_static_ip(iface, ip, mask)
    }
    fn set_dns(&self, iface: &str, dns: &str) -> Result<(), GatewayError> {
        self.0.set_dns(iface, dns)
    }
    fn set_mtu(&self, iface: &str, mtu: u32) -> Result<(), GatewayError> {
        self.0.set_mtu(iface, mtu)
    }
    fn add_persistent_route(&self, gateway: &str) -> Result<(), GatewayError> {
        self.0.add_persistent_route(gateway)
    }
    fn append_hosts_entries(&self) -> Result<Vec<HostsEntry>, GatewayError> {
        self.0.append_hosts_entries()
    }
}

fn config(hosts: &Path) -> Config {
    Config {
        hosts_file: hosts.to_path_buf(),
        ..Config::default()
    }
}

fn desired() -> DesiredConfig {
    DesiredConfig {
        interface: "以太网".into(),
        ip: "10.36.5.20".into(),
        subnet_mask: "255.255.255.0".into(),
        dns: "10.37.128.3".into(),
    }
}

#[test]
fn fresh_machine_gets_every_command() {
    let dir = TempDir::new().unwrap();
    let hosts = dir.path().join("hosts");
    fs::write(&hosts, "127.0.0.1 localhost\n").unwrap();

    let recorder = Recorder::with_script(&[
        ("ipconfig /all", IPCONFIG),
        ("route print -4", ROUTE_PRINT),
        ("netsh interface ipv4 show interface 以太网", "Link MTU : 1500 bytes"),
    ]);
    let gateway = WindowsGateway::with_runner(&config(&hosts), recorder.clone());
    let reconciler = Reconciler::new(Arc::new(Elevated(gateway)), 1300);

    let (missing, report) = reconciler.reconcile(&desired(), false, |_| {}).unwrap();

    assert_eq!(missing.items(), &ConfigItem::ALL);
    assert_eq!(report.hosts_added.len(), 4);
    assert_eq!(
        recorder.mutations(),
        vec![
            "netsh interface ipv4 set address 以太网 static 10.36.5.20 255.255.255.0",
            "netsh interface ipv4 set dns 以太网 static 10.37.128.3",
            "route -p add 10.0.0.0 mask 255.0.0.0 10.36.5.1",
            "netsh interface ipv4 set subinterface 以太网 mtu=1300 store=persistent",
        ]
    );

    let content = fs::read_to_string(&hosts).unwrap();
    assert!(content.starts_with("127.0.0.1 localhost\n"));
    assert_eq!(content.matches(HOSTS_MARKER).count(), 1);
    assert!(content.contains("10.37.224.243 hisips.shx.hsip.gov.cn"));
}

#[test]
fn hosts_append_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let hosts = dir.path().join("hosts");
    fs::write(&hosts, "10.37.225.216 fms.shx.hsip.gov.cn").unwrap();

    let gateway = WindowsGateway::with_runner(&config(&hosts), Recorder::default());
    assert!(!gateway.hosts_already_set());
    assert_eq!(gateway.hosts_status().existing.len(), 1);

    let added = gateway.append_hosts_entries().unwrap();
    assert_eq!(added.len(), 3);
    assert!(gateway.hosts_already_set());

    let after_first = fs::read_to_string(&hosts).unwrap();
    assert!(after_first.starts_with("10.37.225.216 fms.shx.hsip.gov.cn\n"));

    assert!(gateway.append_hosts_entries().unwrap().is_empty());
    assert_eq!(fs::read_to_string(&hosts).unwrap(), after_first);
    assert_eq!(after_first.matches("fms.shx.hsip.gov.cn").count(), 1);
}

#[test]
fn configured_machine_issues_no_mutations() {
    let dir = TempDir::new().unwrap();
    let hosts = dir.path().join("hosts");
    let cfg = config(&hosts);
    let lines: Vec<String> = cfg.hosts_entries.iter().map(|e| e.to_string()).collect();
    fs::write(&hosts, lines.join("\n")).unwrap();

    let recorder = Recorder::with_script(&[
        (
            "ipconfig /all",
            "Ethernet adapter 以太网:\n\n   IPv4 Address. . . : 10.36.5.20(Preferred)\n",
        ),
        (
            "route print -4",
            "          10.0.0.0        255.0.0.0        10.36.5.1       10.36.5.20     26\n",
        ),
        ("netsh interface ipv4 show interface 以太网", "Link MTU : 1300 bytes"),
    ]);
    let gateway = WindowsGateway::with_runner(&cfg, recorder.clone());
    let reconciler = Reconciler::new(Arc::new(Elevated(gateway)), 1300);

    let (missing, report) = reconciler.reconcile(&desired(), false, |_| {}).unwrap();
    assert!(missing.is_empty(), "{missing:?}");
    assert!(report.applied.is_empty());
    assert!(recorder.mutations().is_empty());

    let verification = reconciler.verify("以太网");
    assert!(verification.is_complete());
}
