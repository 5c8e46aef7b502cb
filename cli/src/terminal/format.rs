use crate::terminal::colors;
use colored::*;
use ipnetwork::Ipv4Network;
use medlink_common::network::interface::{NetworkInterface, UNKNOWN_ADDRESS};
use medlink_common::system::ConfigItem;
use medlink_core::reconciler::Verification;

pub fn state(set: bool) -> ColoredString {
    if set {
        "configured".color(colors::GOOD)
    } else {
        "missing".color(colors::BAD)
    }
}

pub fn reachable(ok: bool) -> ColoredString {
    if ok {
        "reachable".color(colors::GOOD)
    } else {
        "unreachable".color(colors::BAD)
    }
}

pub fn item_list(items: &[ConfigItem]) -> String {
    items
        .iter()
        .map(|item| item.label())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn interface_details(
    iface: &NetworkInterface,
    target: &Ipv4Network,
) -> Vec<(String, ColoredString)> {
    let address: ColoredString = match iface.ipv4 {
        Some(addr) => addr.to_string().color(colors::IPV4_ADDR),
        None => UNKNOWN_ADDRESS.dimmed(),
    };
    let network: ColoredString = if iface.within(target) {
        target.to_string().color(colors::GOOD)
    } else {
        "other".dimmed()
    };

    vec![
        (String::from("IPv4"), address),
        (String::from("Network"), network),
    ]
}

pub fn verification_details(verification: &Verification) -> Vec<(String, ColoredString)> {
    let address: ColoredString = match verification.ipv4 {
        Some(addr) => addr.to_string().color(colors::IPV4_ADDR),
        None => UNKNOWN_ADDRESS.dimmed(),
    };

    let mut details = vec![(String::from("IPv4"), address)];
    details.extend(
        ConfigItem::ALL
            .into_iter()
            .map(|item| (item.label().to_string(), state(verification.is_set(item)))),
    );
    details
}
