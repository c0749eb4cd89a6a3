// src/config/models.rs
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Endpoint polled with a plain GET on every tick.
    pub status_check_endpoint: Url,

    /// Poll period in milliseconds.
    pub ping_interval: u64,

    /// Minimum gap between two healthy notifications, in milliseconds.
    pub good_message_interval: u64,

    /// Minimum gap between two unhealthy/unreachable notifications, in milliseconds.
    pub bad_message_interval: u64,

    pub slack_app_token: String,
    pub slack_channel_id: String,

    #[serde(default = "default_slack_api_url")]
    pub slack_api_url: Url,
}

fn default_slack_api_url() -> Url {
    Url::parse("https://slack.com/api/").expect("static Slack API url is valid")
}

impl Config {
    pub fn ping_interval(&self) -> Duration {
        Duration::from_millis(self.ping_interval)
    }

    pub fn throttle(&self) -> ThrottleConfig {
        ThrottleConfig {
            good_interval_ms: self.good_message_interval,
            bad_interval_ms: self.bad_message_interval,
        }
    }

    pub fn slack(&self) -> SlackConfig {
        SlackConfig {
            api_url: self.slack_api_url.clone(),
            token: self.slack_app_token.clone(),
            channel_id: self.slack_channel_id.clone(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.ping_interval == 0 {
            bail!("ping_interval must be greater than zero");
        }

        match self.status_check_endpoint.scheme() {
            "http" | "https" => {}
            other => bail!("status_check_endpoint must be http or https, got {}", other),
        }

        if self.slack_app_token.trim().is_empty() {
            bail!("slack_app_token must not be empty");
        }

        if self.slack_channel_id.trim().is_empty() {
            bail!("slack_channel_id must not be empty");
        }

        Ok(())
    }
}

/// Cooldown windows for the two notification polarities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleConfig {
    pub good_interval_ms: u64,
    pub bad_interval_ms: u64,
}

#[derive(Debug, Clone)]
pub struct SlackConfig {
    pub api_url: Url,
    pub token: String,
    pub channel_id: String,
}
