// src/health/mod.rs
mod outcome;
mod poller;

pub use outcome::{
    classify_response, classify_transport_error, Outcome, ProbeError, UnreachableKind,
};
pub use poller::Poller;
