// SPDX-FileCopyrightText: 2026 Tiprelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider webhook handlers.
//!
//! Each request resolves its target from the current registry snapshot by
//! the secret path segment, verifies the provider token, normalizes the
//! payload, and forwards it. Handlers keep no state between requests.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use tiprelay_core::{DonationEvent, DonationSource, DonationTarget, ForwardOutcome, RelayError};
use tiprelay_forwarder::{Normalized, normalize_saweria, normalize_socialbuzz, test_donation};

use crate::body::JsonBody;
use crate::server::{GatewayState, not_found};
use crate::verify::verify_token;

/// Response body for webhook and test endpoints.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Game name, on test sends.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game: Option<String>,
    /// Failure detail, on test sends.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl WebhookResponse {
    fn ok(message: &str) -> Self {
        Self {
            success: true,
            message: Some(message.to_string()),
            error: None,
            game: None,
            details: None,
        }
    }

    fn failed(error: &str) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.to_string()),
            game: None,
            details: None,
        }
    }
}

fn reply(status: StatusCode, body: WebhookResponse) -> Response {
    (status, Json(body)).into_response()
}

fn unauthorized() -> Response {
    reply(StatusCode::UNAUTHORIZED, WebhookResponse::failed("Unauthorized"))
}

/// Query parameters accepted by the test endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct TestQuery {
    pub password: Option<String>,
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Forward `event` and stamp the target's activity on success.
async fn deliver(
    state: &GatewayState,
    target: &DonationTarget,
    event: &DonationEvent,
) -> Result<ForwardOutcome, RelayError> {
    let outcome = state.forwarder.forward(target, event).await?;
    if let Err(e) = state.registry.record_activity(&target.id).await {
        warn!(game = %target.id, error = %e, "failed to record activity");
    }
    Ok(outcome)
}

/// Token check shared by the provider routes; `None` means authorized.
fn reject_bad_token(
    target: &DonationTarget,
    source: DonationSource,
    headers: &HeaderMap,
    body: &JsonBody,
) -> Option<Response> {
    if verify_token(headers, body.0.as_ref(), target.provider_token(source)) {
        return None;
    }
    warn!(game = %target.display_name, provider = %source, "unauthorized: invalid token");
    Some(unauthorized())
}

/// POST /{secret}/saweria
pub async fn saweria(
    State(state): State<GatewayState>,
    Path(secret): Path<String>,
    headers: HeaderMap,
    body: JsonBody,
) -> Response {
    let targets = state.registry.snapshot();
    let Some(target) = targets.by_webhook_path(&secret) else {
        return not_found();
    };
    info!(game = %target.display_name, provider = "saweria", "webhook received");

    if let Some(rejection) = reject_bad_token(target, DonationSource::Saweria, &headers, &body) {
        return rejection;
    }

    match normalize_saweria(body.0.as_ref(), now()) {
        Normalized::Ignored => reply(StatusCode::OK, WebhookResponse::ok("OK")),
        Normalized::Donation(event) => match deliver(&state, target, &event).await {
            Ok(_) => reply(StatusCode::OK, WebhookResponse::ok("Processed")),
            Err(_) => reply(StatusCode::INTERNAL_SERVER_ERROR, WebhookResponse::failed("Failed")),
        },
    }
}

/// POST /{secret}/socialbuzz
pub async fn socialbuzz(
    State(state): State<GatewayState>,
    Path(secret): Path<String>,
    headers: HeaderMap,
    body: JsonBody,
) -> Response {
    let targets = state.registry.snapshot();
    let Some(target) = targets.by_webhook_path(&secret) else {
        return not_found();
    };
    info!(game = %target.display_name, provider = "socialbuzz", "webhook received");
    tracing::debug!(payload = ?body.0, "raw socialbuzz payload");

    if let Some(rejection) = reject_bad_token(target, DonationSource::SocialBuzz, &headers, &body) {
        return rejection;
    }

    let event = match normalize_socialbuzz(body.0.as_ref(), now()) {
        Ok(event) => event,
        Err(e) => {
            warn!(game = %target.display_name, error = %e, "rejected socialbuzz payload");
            return reply(StatusCode::BAD_REQUEST, WebhookResponse::failed(&e.to_string()));
        }
    };
    tracing::debug!(?event, "normalized socialbuzz donation");

    match deliver(&state, target, &event).await {
        Ok(_) => reply(StatusCode::OK, WebhookResponse::ok("Processed")),
        Err(_) => reply(StatusCode::INTERNAL_SERVER_ERROR, WebhookResponse::failed("Failed")),
    }
}

/// POST /{secret}/test
///
/// Authenticated by the target's current dashboard password (query string
/// first, then body), which must belong to the target named by the path.
pub async fn test_send(
    State(state): State<GatewayState>,
    Path(secret): Path<String>,
    Query(query): Query<TestQuery>,
    body: JsonBody,
) -> Response {
    let targets = state.registry.snapshot();
    let Some(target) = targets.by_webhook_path(&secret) else {
        return not_found();
    };

    let password = query
        .password
        .as_deref()
        .filter(|p| !p.is_empty())
        .or_else(|| body.str_field("password"))
        .unwrap_or_default();
    match targets.authenticate(password) {
        Some(owner) if owner.id == target.id => {}
        _ => {
            warn!(game = %target.display_name, "unauthorized test send");
            return unauthorized();
        }
    }

    info!(game = %target.display_name, "test endpoint");
    let event = test_donation(body.0.as_ref(), now());

    match deliver(&state, target, &event).await {
        Ok(_) => reply(
            StatusCode::OK,
            WebhookResponse {
                game: Some(target.display_name.clone()),
                ..WebhookResponse::ok("Test sent")
            },
        ),
        Err(e) => reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            WebhookResponse {
                details: Some(e.to_string()),
                ..WebhookResponse::failed("Test failed")
            },
        ),
    }
}
