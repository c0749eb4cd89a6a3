// src/health/outcome.rs
use serde_json::Value;
use std::error::Error as StdError;
use std::io;

/// Result of a single status check.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Healthy {
        payload: Value,
    },
    Unhealthy {
        status_code: u16,
        payload: Value,
    },
    Unreachable {
        kind: UnreachableKind,
        detail: ProbeError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnreachableKind {
    /// The peer actively refused the connection.
    ConnectionRefused,
    OtherTransportError,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProbeError {
    #[error("connection refused: {0}")]
    ConnectionRefused(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid response body: {0}")]
    InvalidBody(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ProbeError {
    pub fn kind(&self) -> UnreachableKind {
        match self {
            ProbeError::ConnectionRefused(_) => UnreachableKind::ConnectionRefused,
            ProbeError::Transport(_) | ProbeError::InvalidBody(_) | ProbeError::Internal(_) => {
                UnreachableKind::OtherTransportError
            }
        }
    }

    /// True when the failure came from this process rather than the network.
    pub fn is_unknown(&self) -> bool {
        matches!(self, ProbeError::InvalidBody(_) | ProbeError::Internal(_))
    }
}

impl Outcome {
    pub fn unreachable(detail: ProbeError) -> Self {
        Outcome::Unreachable {
            kind: detail.kind(),
            detail,
        }
    }

    /// Fallback used when a check could not even produce an outcome.
    pub fn internal(reason: impl Into<String>) -> Self {
        Outcome::unreachable(ProbeError::Internal(reason.into()))
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, Outcome::Healthy { .. })
    }
}

/// Classify a completed response. Only 2xx counts as healthy; the body must
/// be JSON either way.
pub fn classify_response(status_code: u16, body: &[u8]) -> Outcome {
    let payload = match serde_json::from_slice::<Value>(body) {
        Ok(payload) => payload,
        Err(e) => return Outcome::unreachable(ProbeError::InvalidBody(e.to_string())),
    };

    if (200..300).contains(&status_code) {
        Outcome::Healthy { payload }
    } else {
        Outcome::Unhealthy {
            status_code,
            payload,
        }
    }
}

/// Map a transport failure onto the probe error taxonomy.
pub fn classify_transport_error(error: &(dyn StdError + 'static)) -> ProbeError {
    let message = error_chain(error);

    if is_connection_refused(error) {
        ProbeError::ConnectionRefused(message)
    } else {
        ProbeError::Transport(message)
    }
}

fn is_connection_refused(error: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(error);
    while let Some(err) = current {
        if let Some(io_err) = err.downcast_ref::<io::Error>() {
            if io_err.kind() == io::ErrorKind::ConnectionRefused {
                return true;
            }
        }
        current = err.source();
    }
    false
}

fn error_chain(error: &(dyn StdError + 'static)) -> String {
    let mut message = error.to_string();
    let mut current = error.source();
    while let Some(err) = current {
        message.push_str(": ");
        message.push_str(&err.to_string());
        current = err.source();
    }
    message
}
