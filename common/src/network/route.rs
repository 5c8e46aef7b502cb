//! Routing-table helpers over `route print -4` output.

use std::net::Ipv4Addr;

const ON_LINK: &[&str] = &["On-link", "在链路上"];

/// `true` when `destination` appears as a token anywhere in the dump.
pub fn route_present(route_print: &str, destination: Ipv4Addr) -> bool {
    let destination = destination.to_string();
    route_print
        .split_whitespace()
        .any(|token| token == destination)
}

/// The lines of the dump that mention `destination`, trimmed.
pub fn route_lines(route_print: &str, destination: Ipv4Addr) -> Vec<String> {
    let destination = destination.to_string();
    route_print
        .lines()
        .filter(|line| line.split_whitespace().any(|token| token == destination))
        .map(|line| line.trim().to_string())
        .collect()
}

/// Gateway of the `0.0.0.0 0.0.0.0` default route, skipping on-link entries.
pub fn parse_default_gateway(route_print: &str) -> Option<Ipv4Addr> {
    route_print.lines().find_map(|line| {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() >= 3 && parts[0] == "0.0.0.0" && parts[1] == "0.0.0.0" {
            if ON_LINK.contains(&parts[2]) {
                return None;
            }
            return parts[2].parse().ok();
        }
        None
    })
}

/// First hop for the medical route: the /24 network of `ip` with host part `.1`.
///
/// Works on the dotted text so a malformed address still reaches `route`,
/// which is the one that rejects it.
pub fn derive_gateway(ip: &str) -> String {
    let ip = ip.trim();
    match ip.rsplit_once('.') {
        Some((network, _host)) => format!("{network}.1"),
        None => format!("{ip}.1"),
    }
}
