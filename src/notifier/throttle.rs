// src/notifier/throttle.rs
//
// Per-polarity notification cooldowns.
//
// Healthy outcomes are throttled by the good cooldown, unhealthy and
// unreachable outcomes share the bad cooldown. Firing one polarity clears
// the other, so a state change is never swallowed by a stale window.

use super::message::{Color, NotificationMessage};
use crate::config::ThrottleConfig;
use crate::health::Outcome;
use tracing::debug;

/// Milliseconds since the Unix epoch. Zero means "no cooldown".
pub type Timestamp = u64;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThrottleState {
    next_good_allowed_at: Timestamp,
    next_bad_allowed_at: Timestamp,
}

impl ThrottleState {
    pub fn next_good_allowed_at(&self) -> Timestamp {
        self.next_good_allowed_at
    }

    pub fn next_bad_allowed_at(&self) -> Timestamp {
        self.next_bad_allowed_at
    }

    fn allows(&self, color: Color, now: Timestamp) -> bool {
        match color {
            Color::Good => now >= self.next_good_allowed_at,
            Color::Bad => now >= self.next_bad_allowed_at,
        }
    }

    fn arm(&mut self, color: Color, now: Timestamp, config: &ThrottleConfig) {
        match color {
            Color::Good => {
                self.next_good_allowed_at = now.saturating_add(config.good_interval_ms);
                self.next_bad_allowed_at = 0;
            }
            Color::Bad => {
                self.next_bad_allowed_at = now.saturating_add(config.bad_interval_ms);
                self.next_good_allowed_at = 0;
            }
        }
    }
}

/// Decides which outcomes turn into chat messages.
#[derive(Debug)]
pub struct Notifier {
    config: ThrottleConfig,
    state: ThrottleState,
}

impl Notifier {
    pub fn new(config: ThrottleConfig) -> Self {
        Self {
            config,
            state: ThrottleState::default(),
        }
    }

    pub fn state(&self) -> ThrottleState {
        self.state
    }

    /// Returns the message to send, or `None` if the outcome falls inside
    /// the active cooldown of its polarity. The state is updated before
    /// returning, so callers may send at their leisure.
    pub fn handle(&mut self, outcome: &Outcome, now: Timestamp) -> Option<NotificationMessage> {
        let color = polarity(outcome);

        if !self.state.allows(color, now) {
            debug!(?color, now, state = ?self.state, "Notification suppressed");
            return None;
        }

        let message = NotificationMessage::from_outcome(outcome);
        self.state.arm(color, now, &self.config);
        Some(message)
    }
}

fn polarity(outcome: &Outcome) -> Color {
    match outcome {
        Outcome::Healthy { .. } => Color::Good,
        Outcome::Unhealthy { .. } | Outcome::Unreachable { .. } => Color::Bad,
    }
}
