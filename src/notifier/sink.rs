// src/notifier/sink.rs
use super::message::NotificationMessage;
use crate::config::SlackConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid API url: {0}")]
    Url(#[from] url::ParseError),

    #[error("Chat API returned HTTP {0}")]
    Status(u16),

    #[error("Chat API rejected message: {0}")]
    Rejected(String),
}

/// Delivers a notification to the chat channel. Called once per emitted
/// message; implementations do not retry.
#[async_trait]
pub trait MessagingSink: Send + Sync {
    async fn send(&self, message: &NotificationMessage) -> Result<(), SinkError>;

    fn name(&self) -> &'static str;
}

pub struct SlackSink {
    client: Client,
    endpoint: Url,
    token: String,
    channel_id: String,
}

#[derive(Serialize)]
struct PostMessage<'a> {
    channel: &'a str,
    attachments: [Attachment<'a>; 1],
}

#[derive(Serialize)]
struct Attachment<'a> {
    color: &'a str,
    text: &'a str,
    fallback: &'a str,
}

#[derive(Deserialize)]
struct PostMessageResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

impl SlackSink {
    pub fn new(config: SlackConfig) -> Result<Self, SinkError> {
        Self::with_client(config, Client::new())
    }

    pub fn with_client(config: SlackConfig, client: Client) -> Result<Self, SinkError> {
        let endpoint = config.api_url.join("chat.postMessage")?;

        Ok(Self {
            client,
            endpoint,
            token: config.token,
            channel_id: config.channel_id,
        })
    }
}

#[async_trait]
impl MessagingSink for SlackSink {
    async fn send(&self, message: &NotificationMessage) -> Result<(), SinkError> {
        let body = PostMessage {
            channel: &self.channel_id,
            attachments: [Attachment {
                color: message.color().hex(),
                text: message.text(),
                fallback: message.text(),
            }],
        };

        let response = self
            .client
            .post(self.endpoint.as_str())
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SinkError::Status(status.as_u16()));
        }

        let reply: PostMessageResponse = response.json().await?;
        if !reply.ok {
            return Err(SinkError::Rejected(
                reply.error.unwrap_or_else(|| "unknown_error".to_string()),
            ));
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "slack"
    }
}
