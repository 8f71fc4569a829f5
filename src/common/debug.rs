//! Opt-in debug logging to a file in the cache directory.

use chrono::Utc;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;

static DEBUG_ENABLED: OnceLock<bool> = OnceLock::new();

/// Path of the debug log file
pub fn debug_log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|c| c.join("wom-bridge").join("debug.log"))
}

/// Enable or disable debug logging for the lifetime of the process.
/// Truncates the previous log on enable.
pub fn init_debug(enabled: bool) {
    let _ = DEBUG_ENABLED.set(enabled);
    if !enabled {
        return;
    }
    if let Some(path) = debug_log_path() {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        let _ = fs::write(
            &path,
            format!("=== wom-bridge debug log started at {} ===\n", Utc::now()),
        );
    }
}

pub fn is_debug_enabled() -> bool {
    *DEBUG_ENABLED.get().unwrap_or(&false)
}

/// Append a timestamped line to the debug log, if enabled.
pub fn debug_log(msg: &str) {
    if !is_debug_enabled() {
        return;
    }
    let Some(path) = debug_log_path() else {
        return;
    };
    if let Ok(mut file) = fs::OpenOptions::new().create(true).append(true).open(&path) {
        let timestamp = Utc::now().format("%H:%M:%S%.3f");
        let _ = writeln!(file, "[{}] {}", timestamp, msg);
    }
}
