//! Unix socket server for the bridge daemon.
//!
//! Host adapters deliver events as newline-delimited JSON commands. All
//! watch-state transitions run under a single mutex; the webhook dispatch
//! itself is spawned fire-and-forget and never touches shared state.

use crate::common::config::BridgeConfig;
use crate::daemon::dispatch::{self, DispatchOutcome};
use crate::daemon::events::{handle_host_event, EventOutcome};
use crate::daemon::notifier::{notify, outcome_message};
use crate::daemon::state::WatchState;
use crate::ipc::messages::{
    get_pid_file_path, get_socket_path, BridgeCommand, BridgeResponse,
};
use anyhow::{Context, Result};
use std::fs;
use std::sync::Arc;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::Mutex;

/// Bridge daemon owning the watch state and HTTP client.
pub struct BridgeServer {
    state: Arc<Mutex<WatchState>>,
    config: Arc<BridgeConfig>,
    http: reqwest::Client,
    start_time: Instant,
}

impl BridgeServer {
    pub fn new(config: BridgeConfig) -> Result<Self> {
        let http = dispatch::build_client().context("Failed to build HTTP client")?;
        Ok(Self {
            state: Arc::new(Mutex::new(WatchState::new())),
            config: Arc::new(config),
            http,
            start_time: Instant::now(),
        })
    }

    /// Run the daemon server until shutdown.
    pub async fn run(&self) -> Result<()> {
        let socket_path = get_socket_path();

        if let Some(parent) = socket_path.parent() {
            fs::create_dir_all(parent).context("Failed to create socket directory")?;
        }
        if socket_path.exists() {
            fs::remove_file(&socket_path).context("Failed to remove existing socket")?;
        }

        let pid_path = get_pid_file_path();
        fs::write(&pid_path, std::process::id().to_string())
            .context("Failed to write PID file")?;

        let listener = UnixListener::bind(&socket_path).context("Failed to bind to socket")?;
        eprintln!("Bridge daemon listening on {:?}", socket_path);
        if !self.config.enabled {
            eprintln!("Bridge is disabled in config; events will be ignored");
        }

        loop {
            let (stream, _) = listener.accept().await.context("Failed to accept connection")?;
            let state = self.state.clone();
            let config = self.config.clone();
            let http = self.http.clone();
            let start_time = self.start_time;

            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, state, config, http, start_time).await {
                    eprintln!("Connection error: {}", e);
                }
            });
        }
    }
}

/// Handle a single client connection (newline-delimited JSON)
async fn handle_connection(
    stream: UnixStream,
    state: Arc<Mutex<WatchState>>,
    config: Arc<BridgeConfig>,
    http: reqwest::Client,
    start_time: Instant,
) -> Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    loop {
        line.clear();
        let bytes_read = reader.read_line(&mut line).await?;
        if bytes_read == 0 {
            break;
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let command: BridgeCommand = match serde_json::from_str(line) {
            Ok(cmd) => cmd,
            Err(e) => {
                let response = BridgeResponse::Error {
                    message: format!("Invalid command: {}", e),
                };
                send_response(&mut writer, &response).await?;
                continue;
            }
        };

        let response = handle_command(command, &state, &config, &http, start_time).await;
        send_response(&mut writer, &response).await?;
    }

    Ok(())
}

/// Handle a single command and return a response
async fn handle_command(
    command: BridgeCommand,
    state: &Arc<Mutex<WatchState>>,
    config: &Arc<BridgeConfig>,
    http: &reqwest::Client,
    start_time: Instant,
) -> BridgeResponse {
    match command {
        BridgeCommand::HostEvent(event) => {
            let now = Instant::now();
            let outcome = {
                let mut state = state.lock().await;
                handle_host_event(&mut state, config, &event, now)
            };

            match outcome {
                EventOutcome::Ignored => {}
                EventOutcome::MissingEndpoint => {
                    notify(&outcome_message(&DispatchOutcome::MissingConfig));
                }
                EventOutcome::Fire(decision) => {
                    // fire-and-forget: a hanging endpoint must not stall
                    // event handling, and shutdown does not await this
                    let http = http.clone();
                    tokio::spawn(async move {
                        let outcome = dispatch::dispatch(&http, &decision).await;
                        notify(&outcome_message(&outcome));
                    });
                }
            }

            BridgeResponse::Ok
        }

        BridgeCommand::Status => {
            let state = state.lock().await;
            let now = Instant::now();
            BridgeResponse::Status {
                running: true,
                enabled: config.enabled,
                armed: state.is_armed(),
                window_remaining_secs: state.window_remaining(now).map(|d| d.as_secs()),
                uptime_secs: start_time.elapsed().as_secs(),
            }
        }

        BridgeCommand::Ping => BridgeResponse::Pong,

        BridgeCommand::Shutdown => {
            eprintln!("Shutdown requested, exiting...");
            let _ = fs::remove_file(get_socket_path());
            let _ = fs::remove_file(get_pid_file_path());
            std::process::exit(0);
        }
    }
}

/// Send a response to a client
async fn send_response(
    writer: &mut tokio::net::unix::OwnedWriteHalf,
    response: &BridgeResponse,
) -> Result<()> {
    let json = serde_json::to_string(response)?;
    writer.write_all(json.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}

/// Check if the daemon is running
pub fn is_daemon_running() -> bool {
    let socket_path = get_socket_path();
    if !socket_path.exists() {
        return false;
    }
    std::os::unix::net::UnixStream::connect(&socket_path).is_ok()
}

/// Send a single command to the running daemon and read its response.
pub async fn send_command(command: BridgeCommand) -> Result<BridgeResponse> {
    let socket_path = get_socket_path();
    let stream = UnixStream::connect(&socket_path)
        .await
        .context("Failed to connect to daemon socket (is the daemon running?)")?;
    let (reader, mut writer) = stream.into_split();

    let json = serde_json::to_string(&command)?;
    writer.write_all(json.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;

    let mut reader = BufReader::new(reader);
    let mut line = String::new();
    reader.read_line(&mut line).await?;
    let response = serde_json::from_str(line.trim()).context("Invalid daemon response")?;
    Ok(response)
}

/// Stop the running daemon, if any.
pub async fn stop_daemon() -> Result<()> {
    if !get_socket_path().exists() {
        return Ok(());
    }

    let stream = UnixStream::connect(&get_socket_path()).await?;
    let (_, mut writer) = stream.into_split();

    let command = serde_json::to_string(&BridgeCommand::Shutdown)?;
    writer.write_all(command.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;

    Ok(())
}
