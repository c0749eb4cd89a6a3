// src/health/poller.rs
use super::outcome::{classify_response, classify_transport_error, Outcome};
use anyhow::{Context, Result};
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

/// Performs exactly one GET against the status endpoint per call.
#[derive(Debug, Clone)]
pub struct Poller {
    endpoint: Url,
    client: Client,
}

impl Poller {
    pub fn new(endpoint: Url) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("status-notifier/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self::with_client(endpoint, client))
    }

    pub fn with_client(endpoint: Url, client: Client) -> Self {
        Self { endpoint, client }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Check the endpoint once. Never fails: every error is folded into
    /// the returned [`Outcome`].
    pub async fn poll(&self) -> Outcome {
        let response = match self.client.get(self.endpoint.as_str()).send().await {
            Ok(response) => response,
            Err(e) => {
                let detail = classify_transport_error(&e);
                warn!(endpoint = %self.endpoint, error = %detail, "Status check failed");
                return Outcome::unreachable(detail);
            }
        };

        let status = response.status();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                let detail = classify_transport_error(&e);
                warn!(endpoint = %self.endpoint, %status, error = %detail, "Failed to read status body");
                return Outcome::unreachable(detail);
            }
        };

        let outcome = classify_response(status.as_u16(), &body);
        debug!(endpoint = %self.endpoint, %status, healthy = outcome.is_healthy(), "Status check complete");
        outcome
    }
}
