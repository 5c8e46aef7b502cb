use std::time::Duration;

use medlink_common::network::ping::{parse_ping_summary, ping_replied};
use medlink_common::utils::console::decode_output;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use super::PingOutcome;

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Runs `ping -n <count> <host>` and reads the result. The process is killed
/// if it outlives `limit`.
pub async fn ping_host(host: &str, count: u32, limit: Duration) -> PingOutcome {
    let count_arg = count.to_string();
    let mut command = Command::new("ping");
    command.args(["-n", count_arg.as_str(), host]).kill_on_drop(true);
    #[cfg(windows)]
    command.creation_flags(CREATE_NO_WINDOW);

    debug!("running ping -n {count} {host}");
    match timeout(limit, command.output()).await {
        Ok(Ok(output)) => read_ping_output(&decode_output(&output.stdout)),
        Ok(Err(e)) => PingOutcome {
            replied: false,
            summary: None,
            detail: format!("ping failed: {e}"),
        },
        Err(_elapsed) => PingOutcome {
            replied: false,
            summary: None,
            detail: format!("ping timed out after {limit:?}"),
        },
    }
}

pub(crate) fn read_ping_output(output: &str) -> PingOutcome {
    let replied = ping_replied(output);
    let summary = parse_ping_summary(output);
    let detail = match (replied, summary) {
        (_, Some(summary)) => summary.to_string(),
        (true, None) => "ping succeeded".to_string(),
        (false, None) => "no response".to_string(),
    };
    PingOutcome {
        replied,
        summary,
        detail,
    }
}
