use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod common;
mod daemon;
mod ipc;

use common::config::BridgeConfig;
use common::debug::init_debug;
use daemon::server::{is_daemon_running, send_command, stop_daemon, BridgeServer};
use ipc::messages::{BridgeCommand, BridgeResponse, ChannelKind, HostEvent};

#[derive(Parser, Debug)]
#[command(name = "wom-bridge")]
#[command(about = "Fires a Sheets webhook when a watched group sync completes")]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the bridge daemon in the foreground
    Run {
        /// Enable debug logging regardless of config
        #[arg(long)]
        debug: bool,
        /// Config file path (default: <config dir>/wom-bridge/config.json)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Show daemon status
    Status,
    /// Ping the daemon
    Ping,
    /// Stop the running daemon
    Stop,
    /// Deliver a host event to the daemon (host adapter entry point)
    Event {
        #[command(subcommand)]
        event: EventCommand,
    },
}

#[derive(Subcommand, Debug)]
enum EventCommand {
    /// A UI menu action was clicked
    Menu {
        /// The menu option label as the host rendered it
        #[arg(long)]
        label: String,
    },
    /// A chat/log line arrived
    Chat {
        /// game | console | engine | mesbox | other
        #[arg(long, default_value = "game")]
        channel: ChannelKind,
        #[arg(long)]
        text: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Commands::Run { debug, config } => {
            let config = BridgeConfig::load(config.as_deref())?;
            init_debug(debug || config.debug_logging);
            let server = BridgeServer::new(config)?;
            server.run().await
        }

        Commands::Status => {
            if !is_daemon_running() {
                println!("daemon: not running");
                return Ok(());
            }
            match send_command(BridgeCommand::Status).await? {
                BridgeResponse::Status {
                    enabled,
                    armed,
                    window_remaining_secs,
                    uptime_secs,
                    ..
                } => {
                    println!("daemon: running (uptime {}s)", uptime_secs);
                    println!("enabled: {}", enabled);
                    match (armed, window_remaining_secs) {
                        (true, Some(secs)) => println!("window: armed, {}s remaining", secs),
                        (true, None) => println!("window: armed, expiring"),
                        _ => println!("window: idle"),
                    }
                }
                other => println!("unexpected response: {:?}", other),
            }
            Ok(())
        }

        Commands::Ping => {
            match send_command(BridgeCommand::Ping).await? {
                BridgeResponse::Pong => println!("pong"),
                other => println!("unexpected response: {:?}", other),
            }
            Ok(())
        }

        Commands::Stop => {
            stop_daemon().await?;
            println!("stop requested");
            Ok(())
        }

        Commands::Event { event } => {
            let host_event = match event {
                EventCommand::Menu { label } => HostEvent::MenuAction { label },
                EventCommand::Chat { channel, text } => HostEvent::ChatLine { channel, text },
            };
            match send_command(BridgeCommand::HostEvent(host_event)).await? {
                BridgeResponse::Ok => {}
                BridgeResponse::Error { message } => eprintln!("daemon error: {}", message),
                other => eprintln!("unexpected response: {:?}", other),
            }
            Ok(())
        }
    }
}
