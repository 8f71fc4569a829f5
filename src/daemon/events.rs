//! Host event handling: arming, classification, and fire decisions.

use crate::common::config::BridgeConfig;
use crate::common::debug::{debug_log, is_debug_enabled};
use crate::common::matcher;
use crate::daemon::state::{Signal, Transition, WatchState, WINDOW_DURATION};
use crate::ipc::messages::{ChannelKind, HostEvent};
use std::time::Instant;

/// Everything the dispatcher needs for one webhook call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FireDecision {
    pub url: String,
    pub secret: Option<String>,
}

/// Outcome of handling one host event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// Nothing to do
    Ignored,
    /// A completed sync was detected; fire the webhook
    Fire(FireDecision),
    /// A completed sync was detected but no endpoint is configured.
    /// The window is consumed; the user gets told once.
    MissingEndpoint,
}

/// Handle one host-delivered event against the watch state.
///
/// The caller serializes invocations (single mutex in the server); the
/// arm/disarm/fire decision is not idempotent under interleaving.
pub fn handle_host_event(
    state: &mut WatchState,
    config: &BridgeConfig,
    event: &HostEvent,
    now: Instant,
) -> EventOutcome {
    if !config.enabled {
        return EventOutcome::Ignored;
    }

    match event {
        HostEvent::MenuAction { label } => {
            if matcher::is_sync_trigger(label, &config.trigger_phrase) {
                state.arm(now);
                debug_log(&format!(
                    "armed detection window for {}s",
                    WINDOW_DURATION.as_secs()
                ));
            }
            EventOutcome::Ignored
        }
        HostEvent::ChatLine { channel, text } => {
            handle_chat_line(state, config, *channel, text, now)
        }
    }
}

fn handle_chat_line(
    state: &mut WatchState,
    config: &BridgeConfig,
    channel: ChannelKind,
    text: &str,
    now: Instant,
) -> EventOutcome {
    // cheap early exit: lines while idle are always ignored
    if !state.is_armed() {
        return EventOutcome::Ignored;
    }
    if !is_watched_channel(channel) {
        return EventOutcome::Ignored;
    }

    let stripped = matcher::strip_tags(text);
    let msg = stripped.trim();
    if msg.is_empty() {
        return EventOutcome::Ignored;
    }

    // failure takes priority should a line somehow match both
    let signal = if matcher::is_failure_signal(msg) {
        Signal::Failure
    } else if matcher::is_success_signal(msg) {
        Signal::Success
    } else {
        Signal::Unrelated
    };

    if is_debug_enabled() && msg.to_lowercase().starts_with("wom:") {
        debug_log(&format!("match check: signal={:?} msg={}", signal, msg));
    }

    match state.on_signal(signal, now) {
        Transition::Idle | Transition::Waiting => EventOutcome::Ignored,
        Transition::Expired => {
            debug_log("window expired; disarmed");
            EventOutcome::Ignored
        }
        Transition::Failed => {
            debug_log(&format!("detected sync failure; disarmed. msg={}", msg));
            EventOutcome::Ignored
        }
        Transition::Debounced => {
            debug_log("debounced duplicate success line");
            EventOutcome::Ignored
        }
        Transition::Fire => {
            if !config.has_endpoint() {
                // window consumed, but nothing to call; last_fire stays
                // unchanged so a real fire is not debounced away later
                return EventOutcome::MissingEndpoint;
            }
            state.record_fire(now);
            EventOutcome::Fire(FireDecision {
                url: config.web_app_url.clone(),
                secret: config.shared_secret.clone(),
            })
        }
    }
}

/// Channels the watched plugin reports on. Player chat and the like are
/// never evaluated.
fn is_watched_channel(channel: ChannelKind) -> bool {
    matches!(
        channel,
        ChannelKind::Game | ChannelKind::Console | ChannelKind::Engine | ChannelKind::MessageBox
    )
}
