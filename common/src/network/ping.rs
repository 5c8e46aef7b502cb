//! Reading the outcome of `ping -n <count> <host>`.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static SUMMARY_EN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Sent = (\d+), Received = (\d+), Lost = (\d+)").expect("ping summary pattern is valid")
});
static SUMMARY_ZH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"已发送 = (\d+)，已接收 = (\d+)，丢失 = (\d+)").expect("ping summary pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PingSummary {
    pub sent: u32,
    pub received: u32,
    pub lost: u32,
}

impl fmt::Display for PingSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sent {}, received {}, lost {}",
            self.sent, self.received, self.lost
        )
    }
}

/// A reply line carries a TTL; "destination unreachable" replies do not.
pub fn ping_replied(output: &str) -> bool {
    output.contains("TTL=")
}

pub fn parse_ping_summary(output: &str) -> Option<PingSummary> {
    let caps = SUMMARY_EN
        .captures(output)
        .or_else(|| SUMMARY_ZH.captures(output))?;
    let field = |idx: usize| caps.get(idx).and_then(|m| m.as_str().parse().ok());

    Some(PingSummary {
        sent: field(1)?,
        received: field(2)?,
        lost: field(3)?,
    })
}
