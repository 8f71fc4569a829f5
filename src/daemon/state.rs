//! Watch window state machine.
//!
//! A single window at a time: arming opens it, and exactly one of expiry,
//! failure, debounce, or fire closes it. Expiry is checked lazily on the
//! next incoming line rather than by a background timer; the only cost is
//! that a stale window is discovered a little late, never fired.

use std::time::{Duration, Instant};

/// How long a detection window stays open after the sync action.
pub const WINDOW_DURATION: Duration = Duration::from_secs(120);

/// Minimum interval between two fires.
pub const DEBOUNCE_DURATION: Duration = Duration::from_secs(10);

/// Classification of a chat line, decided upstream by the matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Success,
    Failure,
    Unrelated,
}

/// How the state machine reacted to one signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// No window open; signal ignored
    Idle,
    /// Window deadline had passed; disarmed without firing
    Expired,
    /// Failure signal inside the window; disarmed without firing
    Failed,
    /// Success inside the debounce interval; window consumed without firing
    Debounced,
    /// Success inside the window; the webhook should fire
    Fire,
    /// Unrelated line; window stays open
    Waiting,
}

/// Single mutable watch state, owned by the daemon server.
///
/// `deadline` doubles as the armed flag: the window is open iff a deadline
/// is set. Never persisted; a daemon restart resets it.
#[derive(Debug, Default)]
pub struct WatchState {
    deadline: Option<Instant>,
    last_fire: Option<Instant>,
}

impl WatchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Time left in the open window, if any.
    pub fn window_remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline.and_then(|d| d.checked_duration_since(now))
    }

    /// Open the detection window, or reset the deadline if one is already
    /// open. Last arming wins.
    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + WINDOW_DURATION);
    }

    pub fn disarm(&mut self) {
        self.deadline = None;
    }

    /// Record a fire that actually went out, for debounce purposes.
    /// Not called when the fire was dropped for a missing endpoint.
    pub fn record_fire(&mut self, now: Instant) {
        self.last_fire = Some(now);
    }

    /// Advance the state machine with one classified line.
    pub fn on_signal(&mut self, signal: Signal, now: Instant) -> Transition {
        let Some(deadline) = self.deadline else {
            return Transition::Idle;
        };

        if now > deadline {
            self.disarm();
            return Transition::Expired;
        }

        match signal {
            Signal::Unrelated => Transition::Waiting,
            Signal::Failure => {
                self.disarm();
                Transition::Failed
            }
            Signal::Success => {
                self.disarm();
                if let Some(last) = self.last_fire {
                    if now.duration_since(last) < DEBOUNCE_DURATION {
                        return Transition::Debounced;
                    }
                }
                Transition::Fire
            }
        }
    }
}
