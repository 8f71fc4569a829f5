//! Bridge configuration, loaded once at daemon startup.
//!
//! The config file is read-only to the core: nothing here is written back,
//! and a missing or partial file falls back to defaults. The endpoint URL is
//! validated at fire time, not at startup.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default menu option text that arms the detection window.
pub const DEFAULT_TRIGGER_PHRASE: &str = "Sync WOM Group";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Apps Script Web App deployment URL (the /exec link).
    pub web_app_url: String,
    /// If false, no events are processed and no requests are sent.
    pub enabled: bool,
    /// Log chat lines during the armed window and HTTP responses.
    pub debug_logging: bool,
    /// Optional shared secret embedded in the webhook payload.
    pub shared_secret: Option<String>,
    /// Menu option text that arms the detection window (substring match).
    pub trigger_phrase: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            web_app_url: String::new(),
            enabled: true,
            debug_logging: false,
            shared_secret: None,
            trigger_phrase: DEFAULT_TRIGGER_PHRASE.to_string(),
        }
    }
}

impl BridgeConfig {
    /// Load configuration from `path`, or from the default location.
    /// A missing file yields the default configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => get_config_file_path(),
        };
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {:?}", path))
    }

    /// Whether a usable endpoint URL is configured.
    pub fn has_endpoint(&self) -> bool {
        !self.web_app_url.trim().is_empty()
    }
}

/// Config file path for the bridge daemon
pub fn get_config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("wom-bridge")
        .join("config.json")
}
