//! # Interface Enumeration
//!
//! Turns `ipconfig /all` output into [`NetworkInterface`] records and reads
//! the MTU out of `netsh interface ipv4 show interface` output.

use std::fmt;
use std::net::Ipv4Addr;
use std::sync::LazyLock;

use ipnetwork::Ipv4Network;
use regex::Regex;

/// Shown in place of an address for adapters that reported no IPv4.
pub const UNKNOWN_ADDRESS: &str = "unknown";

pub const DEFAULT_HEADER_PATTERN: &str = r"^(?:以太网适配器|无线局域网适配器|Ethernet adapter|Wireless LAN adapter)\s+(?P<name>.+?):";
pub const DEFAULT_IPV4_PATTERN: &str =
    r"(?:IPv4 地址|IPv4 Address|IP Address)[^0-9]*(?P<addr>\d{1,3}(?:\.\d{1,3}){3})";

/// Any unindented line ending in a colon opens a new `ipconfig` section,
/// whether or not it is an adapter kind the rules track.
static SECTION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S.*:\s*$").expect("section pattern is valid"));

static MTU_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"MTU\s*:\s*(?P<mtu>\d+)").expect("MTU pattern is valid"));

/// A named adapter and the last IPv4 address it reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkInterface {
    pub name: String,
    pub ipv4: Option<Ipv4Addr>,
}

impl NetworkInterface {
    pub fn new(name: impl Into<String>, ipv4: Option<Ipv4Addr>) -> Self {
        Self {
            name: name.into(),
            ipv4,
        }
    }

    /// `true` when the adapter holds an address inside `network`.
    pub fn within(&self, network: &Ipv4Network) -> bool {
        self.ipv4.is_some_and(|ip| network.contains(ip))
    }

    pub fn address_label(&self) -> String {
        self.ipv4
            .map(|ip| ip.to_string())
            .unwrap_or_else(|| UNKNOWN_ADDRESS.to_string())
    }
}

impl fmt::Display for NetworkInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.address_label())
    }
}

/// Parsing strategy for `ipconfig /all`.
///
/// `header` must expose a `name` capture group and `ipv4` an `addr` capture
/// group. Swap the patterns to support another locale without touching the
/// enumerator itself.
#[derive(Debug, Clone)]
pub struct AdapterRules {
    header: Regex,
    ipv4: Regex,
}

impl AdapterRules {
    pub fn new(header: &str, ipv4: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            header: Regex::new(header)?,
            ipv4: Regex::new(ipv4)?,
        })
    }

    fn adapter_name(&self, line: &str) -> Option<String> {
        self.header
            .captures(line)
            .and_then(|caps| caps.name("name"))
            .map(|name| name.as_str().trim().to_string())
    }

    fn ipv4_address(&self, line: &str) -> Option<Ipv4Addr> {
        self.ipv4
            .captures(line)
            .and_then(|caps| caps.name("addr"))
            .and_then(|addr| addr.as_str().parse().ok())
    }
}

impl Default for AdapterRules {
    /// English and Simplified-Chinese `ipconfig` output.
    fn default() -> Self {
        Self {
            header: Regex::new(DEFAULT_HEADER_PATTERN).expect("adapter header pattern is valid"),
            ipv4: Regex::new(DEFAULT_IPV4_PATTERN).expect("IPv4 field pattern is valid"),
        }
    }
}

/// Parses `ipconfig /all` output.
///
/// Every adapter header produces exactly one record, in input order. The last
/// IPv4 line seen before the next header wins; adapters without one keep
/// `ipv4: None`. Sections the rules do not track (PPP, tunnel, ...) close the
/// pending record and contribute nothing.
pub fn parse_interfaces(output: &str, rules: &AdapterRules) -> Vec<NetworkInterface> {
    let mut interfaces: Vec<NetworkInterface> = Vec::new();
    let mut current: Option<NetworkInterface> = None;

    for raw in output.lines() {
        let line: &str = raw.trim();
        if let Some(name) = rules.adapter_name(line) {
            interfaces.extend(current.take());
            current = Some(NetworkInterface::new(name, None));
            continue;
        }

        if SECTION_PATTERN.is_match(raw) {
            interfaces.extend(current.take());
            continue;
        }

        if let Some(iface) = current.as_mut() {
            if let Some(ip) = rules.ipv4_address(line) {
                iface.ipv4 = Some(ip);
            }
        }
    }

    interfaces.extend(current);
    interfaces
}

/// Extracts the MTU from `netsh interface ipv4 show interface <name>` output.
pub fn parse_mtu(output: &str) -> Option<u32> {
    MTU_PATTERN
        .captures(output)
        .and_then(|caps| caps.name("mtu"))
        .and_then(|mtu| mtu.as_str().parse().ok())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
