// src/notifier/message.rs
use crate::health::{Outcome, ProbeError, UnreachableKind};
use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Serializer, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Good,
    Bad,
}

impl Color {
    /// Attachment color as understood by Slack.
    pub fn hex(&self) -> &'static str {
        match self {
            Color::Good => "#05fa3a",
            Color::Bad => "#ff0000",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    color: Color,
    text: String,
}

impl NotificationMessage {
    pub fn new(color: Color, text: impl Into<String>) -> Self {
        Self {
            color,
            text: text.into(),
        }
    }

    /// Render the chat message for an outcome.
    pub fn from_outcome(outcome: &Outcome) -> Self {
        match outcome {
            Outcome::Healthy { payload } => Self::new(
                Color::Good,
                format!(
                    "Production is healthy 😎\n\nResponse:\n```{}```",
                    pretty_json(payload)
                ),
            ),
            Outcome::Unhealthy {
                status_code,
                payload,
            } => Self::new(
                Color::Bad,
                format!(
                    "Production is unhealthy! {}\n\nResponse:\n```{}```",
                    status_code,
                    pretty_json(payload)
                ),
            ),
            Outcome::Unreachable { kind, detail } => {
                Self::new(Color::Bad, unreachable_text(*kind, detail))
            }
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

fn unreachable_text(kind: UnreachableKind, detail: &ProbeError) -> String {
    match kind {
        UnreachableKind::ConnectionRefused => format!(
            "Production is OFFLINE!\n\nSystem ECONNREFUSED Error:\n```{}```",
            detail
        ),
        UnreachableKind::OtherTransportError if detail.is_unknown() => format!(
            "Unable to check status!\n\nUnknown error:\n```{}```",
            detail
        ),
        UnreachableKind::OtherTransportError => {
            format!("Production is possibly OFFLINE!\n\nError:\n```{}```", detail)
        }
    }
}

/// JSON with a four space indent.
fn pretty_json(value: &Value) -> String {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    if value.serialize(&mut ser).is_err() {
        return value.to_string();
    }
    String::from_utf8(buf).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_healthy_message() {
        let msg = NotificationMessage::from_outcome(&Outcome::Healthy {
            payload: json!({"db": "ok"}),
        });

        assert_eq!(msg.color(), Color::Good);
        assert_eq!(
            msg.text(),
            "Production is healthy 😎\n\nResponse:\n```{\n    \"db\": \"ok\"\n}```"
        );
    }

    #[test]
    fn test_unhealthy_message_contains_status() {
        let msg = NotificationMessage::from_outcome(&Outcome::Unhealthy {
            status_code: 503,
            payload: json!({"db": "down"}),
        });

        assert_eq!(msg.color(), Color::Bad);
        assert!(msg.text().starts_with("Production is unhealthy! 503"));
        assert!(msg.text().contains("\"db\": \"down\""));
    }

    #[test]
    fn test_refused_is_offline() {
        let msg = NotificationMessage::from_outcome(&Outcome::unreachable(
            ProbeError::ConnectionRefused("tcp connect error".into()),
        ));

        assert_eq!(msg.color(), Color::Bad);
        assert!(msg.text().starts_with("Production is OFFLINE!"));
        assert!(msg.text().contains("ECONNREFUSED"));
    }

    #[test]
    fn test_transport_error_is_possibly_offline() {
        let msg = NotificationMessage::from_outcome(&Outcome::unreachable(ProbeError::Transport(
            "dns error".into(),
        )));

        assert!(msg.text().starts_with("Production is possibly OFFLINE!"));
        assert!(msg.text().contains("dns error"));
    }

    #[test]
    fn test_internal_error_is_unable_to_check() {
        let msg = NotificationMessage::from_outcome(&Outcome::internal("unable to check status"));

        assert_eq!(msg.color(), Color::Bad);
        assert!(msg.text().starts_with("Unable to check status!"));

        let msg = NotificationMessage::from_outcome(&Outcome::unreachable(
            ProbeError::InvalidBody("expected value at line 1 column 1".into()),
        ));
        assert!(msg.text().starts_with("Unable to check status!"));
    }

    #[test]
    fn test_payload_keeps_response_key_order() {
        let payload: Value =
            serde_json::from_str(r#"{"zeta":1,"alpha":{"ok":true},"middle":null}"#).unwrap();
        let msg = NotificationMessage::from_outcome(&Outcome::Healthy { payload });

        let zeta = msg.text().find("\"zeta\"").unwrap();
        let alpha = msg.text().find("\"alpha\"").unwrap();
        let middle = msg.text().find("\"middle\"").unwrap();
        assert!(zeta < alpha && alpha < middle, "keys reordered: {}", msg.text());
    }

    #[test]
    fn test_color_hex() {
        assert_eq!(Color::Good.hex(), "#05fa3a");
        assert_eq!(Color::Bad.hex(), "#ff0000");
    }
}
