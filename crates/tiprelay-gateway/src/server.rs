// SPDX-FileCopyrightText: 2026 Tiprelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Router assembly and the listener loop.
//!
//! One router serves the provider webhooks, the dashboard JSON API, and the
//! HTML views; every handler reads the same [`GatewayState`].

use std::sync::Arc;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use tiprelay_config::model::ServerConfig;
use tiprelay_core::{Forwarder, RelayError};
use tiprelay_registry::{AdminAuth, Registry};

use crate::{api, views, webhooks};

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Active donation targets and password mutation.
    pub registry: Arc<Registry>,
    /// Admin credential checks.
    pub admin: AdminAuth,
    /// Outbound messaging client.
    pub forwarder: Arc<dyn Forwarder>,
}

/// Error response body for unmatched routes.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// `404 {"error":"Not found"}`, used for unmatched paths and unknown webhook secrets.
pub fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "Not found".to_string(),
        }),
    )
        .into_response()
}

async fn fallback() -> Response {
    not_found()
}

/// Build the application router.
///
/// Routes:
/// - GET / (landing page), GET /dashboard, GET /admin/dashboard
/// - POST /api/auth, POST /api/admin/auth, POST /api/user/change-password
/// - GET /api/admin/users, POST /api/admin/reset-password
/// - POST /{secret}/saweria, POST /{secret}/socialbuzz, POST /{secret}/test
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/", get(views::landing))
        .route("/dashboard", get(views::game_dashboard))
        .route("/admin/dashboard", get(views::admin_dashboard))
        .route("/api/auth", post(api::auth))
        .route("/api/admin/auth", post(api::admin_auth))
        .route("/api/user/change-password", post(api::change_password))
        .route("/api/admin/users", get(api::admin_users))
        .route("/api/admin/reset-password", post(api::reset_password))
        .route("/{secret}/saweria", post(webhooks::saweria))
        .route("/{secret}/socialbuzz", post(webhooks::socialbuzz))
        .route("/{secret}/test", post(webhooks::test_send))
        .fallback(fallback)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind to the configured host:port and serve until `shutdown` is cancelled.
///
/// In-flight requests are allowed to finish after cancellation.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), RelayError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| RelayError::Config(format!("failed to bind {addr}: {e}")))?;

    tracing::info!("server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| RelayError::Internal(format!("server error: {e}")))?;

    tracing::info!("server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiprelay_test_utils::{MemoryStore, MockForwarder, slots};

    #[test]
    fn gateway_state_is_clone() {
        let store = Arc::new(MemoryStore::new());
        let state = GatewayState {
            registry: Arc::new(Registry::new(&slots(&[1]), store.clone())),
            admin: AdminAuth::new(store),
            forwarder: Arc::new(MockForwarder::new()),
        };
        let _cloned = state.clone();
    }

    #[tokio::test]
    async fn start_server_reports_bind_failure() {
        let occupied = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = occupied.local_addr().unwrap().port();

        let store = Arc::new(MemoryStore::new());
        let state = GatewayState {
            registry: Arc::new(Registry::new(&slots(&[1]), store.clone())),
            admin: AdminAuth::new(store),
            forwarder: Arc::new(MockForwarder::new()),
        };
        let config = ServerConfig {
            host: "127.0.0.1".into(),
            port,
        };

        let result = start_server(&config, state, CancellationToken::new()).await;
        assert!(matches!(result, Err(RelayError::Config(_))));
    }
}
