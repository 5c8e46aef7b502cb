mod commands;
mod terminal;

use commands::apply::ApplyArgs;
use commands::{CommandLine, Commands, apply, check, hosts, interfaces, mtu, status, verify};
use medlink_common::config::Config;
use terminal::{logging, print};

fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(run(commands));
    // Timed-out lookups or commands may still be running; do not wait for them.
    runtime.shutdown_background();
    result
}

async fn run(commands: CommandLine) -> anyhow::Result<()> {

    logging::init_logging()?;

    let cfg: Config = commands.config()?;
    print::banner(cfg.quiet);

    let result = match commands.command {
        Commands::Interfaces => {
            print::header("network interfaces", cfg.quiet);
            interfaces::interfaces(&cfg).await
        }
        Commands::Status { interface } => {
            print::header("configuration status", cfg.quiet);
            status::status(interface, &cfg).await
        }
        Commands::Apply {
            interface,
            ip,
            mask,
            dns,
            force,
        } => {
            print::header("applying configuration", cfg.quiet);
            let args = ApplyArgs {
                interface,
                ip,
                mask,
                dns,
                force,
            };
            apply::apply(args, &cfg).await
        }
        Commands::Hosts { check } => {
            print::header("hosts file", cfg.quiet);
            hosts::hosts(check, &cfg).await
        }
        Commands::Verify { interface } => {
            print::header("verification", cfg.quiet);
            verify::verify(interface, &cfg).await
        }
        Commands::Check => {
            print::header("medical network check", cfg.quiet);
            check::check(&cfg).await
        }
        Commands::MtuAll => {
            print::header("mtu on all adapters", cfg.quiet);
            mtu::mtu_all(&cfg).await
        }
    };

    print::end_of_program(cfg.quiet);
    result
}
