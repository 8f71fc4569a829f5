//! IPC message types for host-adapter/daemon communication.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Chat channel kinds as reported by the host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelKind {
    /// Game/system messages
    Game,
    /// Developer console output
    Console,
    /// Engine-generated messages
    Engine,
    /// Modal message boxes
    MessageBox,
    /// Anything else (player chat, trade, ...)
    Other,
}

impl std::str::FromStr for ChannelKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "game" => Ok(Self::Game),
            "console" => Ok(Self::Console),
            "engine" => Ok(Self::Engine),
            "mesbox" | "messagebox" => Ok(Self::MessageBox),
            "other" => Ok(Self::Other),
            other => Err(format!("unknown channel kind: {}", other)),
        }
    }
}

/// Events delivered by the host adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum HostEvent {
    /// A UI menu action was clicked
    MenuAction { label: String },
    /// A line of chat/log text arrived
    ChatLine { channel: ChannelKind, text: String },
}

/// Commands sent to the daemon over the unix socket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BridgeCommand {
    /// Deliver a host event (from the host adapter)
    HostEvent(HostEvent),
    /// Request daemon status
    Status,
    /// Ping for health check
    Ping,
    /// Graceful shutdown
    Shutdown,
}

/// Response from the daemon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BridgeResponse {
    /// Command accepted
    Ok,
    /// Pong response for health check
    Pong,
    /// Error response
    Error { message: String },
    /// Daemon status info
    Status {
        running: bool,
        enabled: bool,
        armed: bool,
        /// Seconds until the open window expires, if armed
        window_remaining_secs: Option<u64>,
        uptime_secs: u64,
    },
}

/// Socket path for daemon communication
pub fn get_socket_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("wom-bridge")
        .join("daemon.sock")
}

/// PID file path for the daemon
pub fn get_pid_file_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("wom-bridge")
        .join("daemon.pid")
}
