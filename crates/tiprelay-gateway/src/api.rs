// SPDX-FileCopyrightText: 2026 Tiprelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dashboard and admin JSON API.
//!
//! Login and password endpoints answer `200` with `{success:false, error}`
//! for rejected input so the browser dashboard can show the message; only
//! the admin endpoints use `401` for a bad token.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use tiprelay_core::RelayError;

use crate::body::JsonBody;
use crate::server::GatewayState;

/// Minimum length for dashboard passwords.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Generic `{success, message?, error?, token?}` response.
#[derive(Debug, Default, Serialize)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl ApiResponse {
    fn success() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    fn failure() -> Self {
        Self::default()
    }

    fn message(message: &str) -> Self {
        Self {
            message: Some(message.to_string()),
            ..Self::success()
        }
    }

    fn error(error: &str) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::failure()
        }
    }
}

fn json(body: ApiResponse) -> Response {
    Json(body).into_response()
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(ApiResponse::error("Unauthorized"))).into_response()
}

/// One game in the admin users list. Carries no secrets.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub universe_id: String,
    pub last_active: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub has_password: bool,
}

/// Response body for GET /api/admin/users.
#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub success: bool,
    pub users: Vec<UserSummary>,
}

#[derive(Debug, Default, Deserialize)]
struct PasswordLogin {
    password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AdminLogin {
    username: Option<String>,
    password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChangePassword {
    current_password: Option<String>,
    new_password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResetPassword {
    token: Option<String>,
    game_id: Option<String>,
    new_password: Option<String>,
}

/// Query string carrying an admin token.
#[derive(Debug, Default, Deserialize)]
pub struct TokenQuery {
    pub token: Option<String>,
}

fn password_too_short(password: Option<&str>) -> bool {
    password.is_none_or(|p| p.chars().count() < MIN_PASSWORD_LEN)
}

fn save_error_message(err: &RelayError) -> String {
    match err {
        RelayError::Validation(message) => message.clone(),
        _ => "Failed to save password".to_string(),
    }
}

/// True when `token` is present and decodes to the current admin credential.
async fn admin_token_valid(state: &GatewayState, token: Option<&str>) -> bool {
    match token.filter(|t| !t.is_empty()) {
        Some(token) => state.admin.validate_token(token).await,
        None => false,
    }
}

/// POST /api/auth
pub async fn auth(State(state): State<GatewayState>, body: JsonBody) -> Response {
    let login: PasswordLogin = body.parse();
    let password = login.password.unwrap_or_default();
    let authenticated = state.registry.snapshot().authenticate(&password).is_some();
    json(ApiResponse {
        success: authenticated,
        ..ApiResponse::default()
    })
}

/// POST /api/admin/auth
pub async fn admin_auth(State(state): State<GatewayState>, body: JsonBody) -> Response {
    let login: AdminLogin = body.parse();
    let username = login.username.unwrap_or_default();
    let password = login.password.unwrap_or_default();

    match state.admin.issue_token(&username, &password).await {
        Some(token) => {
            info!(%username, "admin logged in");
            json(ApiResponse {
                token: Some(token),
                ..ApiResponse::success()
            })
        }
        None => json(ApiResponse::failure()),
    }
}

/// POST /api/user/change-password
pub async fn change_password(State(state): State<GatewayState>, body: JsonBody) -> Response {
    let request: ChangePassword = body.parse();

    if password_too_short(request.new_password.as_deref()) {
        return json(ApiResponse::error("Password must be at least 6 characters"));
    }
    let new_password = request.new_password.unwrap_or_default();

    let current = request.current_password.unwrap_or_default();
    let game_id = match state.registry.snapshot().authenticate(&current) {
        Some(target) => target.id.clone(),
        None => return json(ApiResponse::error("Current password is incorrect")),
    };

    match state.registry.set_password(&game_id, &new_password).await {
        Ok(()) => json(ApiResponse::message("Password changed successfully")),
        Err(e) => {
            warn!(game = %game_id, error = %e, "password change failed");
            json(ApiResponse::error(&save_error_message(&e)))
        }
    }
}

/// GET /api/admin/users?token=
pub async fn admin_users(
    State(state): State<GatewayState>,
    Query(query): Query<TokenQuery>,
) -> Response {
    if !admin_token_valid(&state, query.token.as_deref()).await {
        return unauthorized();
    }

    let persisted = state.registry.store().load().await;
    let users = state
        .registry
        .snapshot()
        .iter()
        .map(|target| {
            let record = persisted.game(&target.id);
            UserSummary {
                id: target.id.clone(),
                name: target.display_name.clone(),
                universe_id: target.universe_id.clone(),
                last_active: record
                    .and_then(|r| r.last_active)
                    .unwrap_or(target.last_active_at),
                created_at: record
                    .and_then(|r| r.created_at)
                    .unwrap_or(target.created_at),
                has_password: !target.access_password.is_empty(),
            }
        })
        .collect();

    Json(UsersResponse {
        success: true,
        users,
    })
    .into_response()
}

/// POST /api/admin/reset-password
pub async fn reset_password(State(state): State<GatewayState>, body: JsonBody) -> Response {
    let request: ResetPassword = body.parse();

    if !admin_token_valid(&state, request.token.as_deref()).await {
        return unauthorized();
    }
    if password_too_short(request.new_password.as_deref()) {
        return json(ApiResponse::error("Password must be at least 6 characters"));
    }

    let game_id = request.game_id.unwrap_or_default();
    let new_password = request.new_password.unwrap_or_default();

    match state.registry.set_password(&game_id, &new_password).await {
        Ok(()) => {
            info!(game = %game_id, "admin reset password");
            json(ApiResponse::message("Password reset successfully"))
        }
        Err(e) => {
            warn!(game = %game_id, error = %e, "password reset failed");
            json(ApiResponse::error(&save_error_message(&e)))
        }
    }
}
