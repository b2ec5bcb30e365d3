// SPDX-FileCopyrightText: 2026 Tiprelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the game platform's messaging API.
//!
//! Provides [`MessagingClient`], which publishes one donation event per call
//! to a universe/topic pair. There is no retry: a failed publish surfaces
//! immediately as [`RelayError::Upstream`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use secrecy::ExposeSecret;
use serde_json::Value;
use tracing::{error, info, warn};

use tiprelay_config::model::ForwarderConfig;
use tiprelay_core::{DonationEvent, DonationTarget, ForwardOutcome, Forwarder, RelayError};

use crate::format::format_rupiah;

/// Publishes donation events to the messaging service.
#[derive(Debug, Clone)]
pub struct MessagingClient {
    client: reqwest::Client,
    base_url: Url,
}

impl MessagingClient {
    /// Creates a client with the configured base URL and per-request timeout.
    pub fn new(config: &ForwarderConfig) -> Result<Self, RelayError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| RelayError::Config(format!("invalid forwarder base_url: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(RelayError::Config(format!(
                "forwarder base_url cannot be used as a base: {}",
                config.base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RelayError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    /// Topic endpoint for a target:
    /// `{base}/messaging-service/v1/universes/{universe}/topics/{topic}`.
    ///
    /// Both the universe and the topic are percent-encoded as path segments.
    pub fn endpoint(&self, target: &DonationTarget) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend([
                "messaging-service",
                "v1",
                "universes",
                target.universe_id.as_str(),
                "topics",
                target.topic.as_str(),
            ]);
        }
        url
    }
}

#[async_trait]
impl Forwarder for MessagingClient {
    async fn forward(
        &self,
        target: &DonationTarget,
        event: &DonationEvent,
    ) -> Result<ForwardOutcome, RelayError> {
        let message = serde_json::to_string(event)
            .map_err(|e| RelayError::Internal(format!("failed to encode donation event: {e}")))?;

        info!(
            game = %target.display_name,
            amount = %format_rupiah(event.amount),
            username = %event.username,
            "sending donation"
        );

        let response = self
            .client
            .post(self.endpoint(target))
            .header("x-api-key", target.api_key.expose_secret())
            .json(&serde_json::json!({ "message": message }))
            .send()
            .await
            .map_err(|e| {
                error!(game = %target.display_name, error = %e, "messaging request failed");
                RelayError::Upstream {
                    status: None,
                    message: format!("messaging request failed: {e}"),
                    source: Some(Box::new(e)),
                }
            })?;

        let status = response.status();
        let text = body_or_empty(target, response.text().await);

        if !status.is_success() {
            error!(
                game = %target.display_name,
                status = status.as_u16(),
                body = %text,
                "messaging API rejected donation"
            );
            return Err(RelayError::Upstream {
                status: Some(status.as_u16()),
                message: format!("messaging API returned {status}"),
                source: None,
            });
        }

        info!(game = %target.display_name, status = status.as_u16(), "donation delivered");
        Ok(ForwardOutcome {
            status: status.as_u16(),
            body: serde_json::from_str(&text).unwrap_or(Value::Null),
        })
    }
}

/// Response body text; a body that cannot be read is logged and treated as empty.
fn body_or_empty(target: &DonationTarget, body: Result<String, reqwest::Error>) -> String {
    match body {
        Ok(text) => text,
        Err(e) => {
            warn!(
                game = %target.display_name,
                error = %e,
                "failed to read messaging response body"
            );
            String::new()
        }
    }
}
