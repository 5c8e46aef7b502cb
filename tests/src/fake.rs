use std::sync::Mutex;

use medlink_common::config::Config;
use medlink_common::error::GatewayError;
use medlink_common::hosts::{HostsEntry, HostsStatus};
use medlink_common::network::interface::NetworkInterface;
use medlink_common::system::SystemGateway;

/// Mutator invocation seen by [`FakeGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    SetStaticIp { iface: String, ip: String, mask: String },
    SetDns { iface: String, dns: String },
    SetMtu { iface: String, mtu: u32 },
    AddRoute { gateway: String },
    AppendHosts,
}

impl Call {
    fn name(&self) -> &'static str {
        match self {
            Call::SetStaticIp { .. } => "set_static_ip",
            Call::SetDns { .. } => "set_dns",
            Call::SetMtu { .. } => "set_mtu",
            Call::AddRoute { .. } => "add_persistent_route",
            Call::AppendHosts => "append_hosts_entries",
        }
    }
}

/// Gateway with fixed probe answers that records every mutator call and can
/// be told to fail one of them.
pub struct FakeGateway {
    pub ip_set: bool,
    pub route_set: bool,
    pub mtu_set: bool,
    pub hosts_set: bool,
    pub elevated: bool,
    pub fail_on: Option<&'static str>,
    pub interfaces: Vec<NetworkInterface>,
    pub(crate) required: Vec<HostsEntry>,
    pub(crate) calls: Mutex<Vec<Call>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self {
            ip_set: false,
            route_set: false,
            mtu_set: false,
            hosts_set: false,
            elevated: true,
            fail_on: None,
            interfaces: Vec::new(),
            required: Config::default().hosts_entries,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn configured() -> Self {
        Self {
            ip_set: true,
            route_set: true,
            mtu_set: true,
            hosts_set: true,
            ..Self::new()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> Result<(), GatewayError> {
        let name = call.name();
        self.calls.lock().unwrap().push(call);
        if self.fail_on == Some(name) {
            return Err(GatewayError::CommandFailed {
                command: format!("fake {name}"),
                status: "exit code: 1".into(),
                output: "The requested operation requires elevation.".into(),
            });
        }
        Ok(())
    }
}

impl SystemGateway for FakeGateway {
    fn list_interfaces(&self) -> Result<Vec<NetworkInterface>, GatewayError> {
        Ok(self.interfaces.clone())
    }

    fn is_elevated(&self) -> bool {
        self.elevated
    }

    fn ip_already_set(&self, _iface: &str) -> bool {
        self.ip_set
    }

    fn mtu_already_set(&self, _iface: &str) -> bool {
        self.mtu_set
    }

    fn route_already_set(&self) -> bool {
        self.route_set
    }

    fn hosts_status(&self) -> HostsStatus {
        if self.hosts_set {
            HostsStatus {
                existing: self.required.clone(),
                missing: Vec::new(),
            }
        } else {
            HostsStatus::unreadable(&self.required)
        }
    }

    fn set_static_ip(&self, iface: &str, ip: &str, mask: &str) -> Result<(), GatewayError> {
        self.record(Call::SetStaticIp {
            iface: iface.into(),
            ip: ip.into(),
            mask: mask.into(),
        })
    }

    fn set_dns(&self, iface: &str, dns: &str) -> Result<(), GatewayError> {
        self.record(Call::SetDns {
            iface: iface.into(),
            dns: dns.into(),
        })
    }

    fn set_mtu(&self, iface: &str, mtu: u32) -> Result<(), GatewayError> {
        self.record(Call::SetMtu {
            iface: iface.into(),
            mtu,
        })
    }

    fn add_persistent_route(&self, gateway: &str) -> Result<(), GatewayError> {
        self.record(Call::AddRoute {
            gateway: gateway.into(),
        })
    }

    fn append_hosts_entries(&self) -> Result<Vec<HostsEntry>, GatewayError> {
        self.record(Call::AppendHosts)?;
        Ok(self.required.clone())
    }
}
