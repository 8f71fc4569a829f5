//! User-facing notifications for trigger outcomes.

use crate::daemon::dispatch::DispatchOutcome;
use std::process::Command;

const TITLE: &str = "WOM → Sheets Bridge";

/// Human-readable message for a dispatch outcome. Exactly one per attempt.
pub fn outcome_message(outcome: &DispatchOutcome) -> String {
    match outcome {
        DispatchOutcome::Triggered => "Sheets script triggered.".to_string(),
        DispatchOutcome::HttpFailure(code) => format!("Trigger failed (HTTP {}).", code),
        DispatchOutcome::TransportError(_) => "Error calling Sheets endpoint.".to_string(),
        DispatchOutcome::MissingConfig => "Configure Web App URL.".to_string(),
    }
}

/// Deliver a notification to the user, best effort.
pub fn notify(message: &str) {
    #[cfg(target_os = "macos")]
    {
        if notify_macos(TITLE, message) {
            return;
        }
    }

    #[cfg(target_os = "linux")]
    {
        if notify_linux(TITLE, message) {
            return;
        }
    }

    notify_tmux(message);
}

/// macOS notification via terminal-notifier, falling back to osascript
#[cfg(target_os = "macos")]
fn notify_macos(title: &str, message: &str) -> bool {
    if Command::new("terminal-notifier")
        .args(["-title", title, "-message", message, "-sound", "default"])
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
    {
        return true;
    }

    let script = format!(
        "display notification \"{}\" with title \"{}\"",
        message.replace('"', "\\\""),
        title.replace('"', "\\\"")
    );
    Command::new("osascript")
        .args(["-e", &script])
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

#[cfg(target_os = "linux")]
fn notify_linux(title: &str, message: &str) -> bool {
    Command::new("notify-send")
        .args([title, message])
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Last-resort notification via tmux display-message
fn notify_tmux(message: &str) {
    let text = format!("{}: {}", TITLE, message);
    let _ = Command::new("tmux")
        .args(["display-message", "-d", "3000", &text])
        .output();
}
