// SPDX-FileCopyrightText: 2026 Tiprelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTML views: landing page, per-game dashboard, admin dashboard.
//!
//! Failed dashboard authentication redirects to the landing page.

use axum::{
    extract::{Query, State},
    http::{HeaderMap, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use tiprelay_core::{DonationSource, DonationTarget};

use crate::api::TokenQuery;
use crate::render::render_template;
use crate::server::GatewayState;

const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");
const DASHBOARD_TEMPLATE: &str = include_str!("../templates/dashboard.html");
const ADMIN_DASHBOARD_TEMPLATE: &str = include_str!("../templates/admin-dashboard.html");

#[derive(Debug, Default, Deserialize)]
pub struct PasswordQuery {
    pub password: Option<String>,
}

/// Label and CSS class for a provider token badge.
fn badge(target: &DonationTarget, source: DonationSource) -> (&'static str, &'static str) {
    match target.provider_token(source) {
        Some(_) => ("\u{2713} Configured", "badge-success"),
        None => ("\u{26a0} Optional", "badge-warning"),
    }
}

/// Public base URL as seen by the browser.
fn base_url(headers: &HeaderMap) -> String {
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .filter(|h| !h.is_empty())
        .unwrap_or("localhost");
    format!("https://{host}")
}

/// Render the per-game dashboard.
pub fn render_dashboard(target: &DonationTarget, password: &str, base_url: &str) -> String {
    let (saweria_label, saweria_class) = badge(target, DonationSource::Saweria);
    let (socialbuzz_label, socialbuzz_class) = badge(target, DonationSource::SocialBuzz);

    render_template(
        DASHBOARD_TEMPLATE,
        &[
            ("gameName", target.display_name.as_str()),
            ("universeId", target.universe_id.as_str()),
            ("topic", target.topic.as_str()),
            ("password", password),
            ("baseUrl", base_url),
            ("webhookSecret", target.webhook_path.as_str()),
            ("saweriaBadge", saweria_label),
            ("saweriaBadgeClass", saweria_class),
            ("socialbuzzBadge", socialbuzz_label),
            ("socialbuzzBadgeClass", socialbuzz_class),
        ],
    )
}

/// Render the admin dashboard.
pub fn render_admin_dashboard(token: &str) -> String {
    render_template(ADMIN_DASHBOARD_TEMPLATE, &[("token", token)])
}

/// GET /
pub async fn landing() -> Html<&'static str> {
    Html(INDEX_TEMPLATE)
}

/// GET /dashboard?password=
pub async fn game_dashboard(
    State(state): State<GatewayState>,
    Query(query): Query<PasswordQuery>,
    headers: HeaderMap,
) -> Response {
    let password = query.password.unwrap_or_default();
    let targets = state.registry.snapshot();
    match targets.authenticate(&password) {
        Some(target) => Html(render_dashboard(target, &password, &base_url(&headers))).into_response(),
        None => Redirect::to("/").into_response(),
    }
}

/// GET /admin/dashboard?token=
pub async fn admin_dashboard(
    State(state): State<GatewayState>,
    Query(query): Query<TokenQuery>,
) -> Response {
    let token = query.token.unwrap_or_default();
    if token.is_empty() || !state.admin.validate_token(&token).await {
        return Redirect::to("/").into_response();
    }
    Html(render_admin_dashboard(&token)).into_response()
}
