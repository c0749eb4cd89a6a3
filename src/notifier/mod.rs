// src/notifier/mod.rs
mod message;
mod sink;
mod throttle;

pub use message::{Color, NotificationMessage};
pub use sink::{MessagingSink, SinkError, SlackSink};
pub use throttle::{Notifier, ThrottleState, Timestamp};
