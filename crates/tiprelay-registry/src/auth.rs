// SPDX-FileCopyrightText: 2026 Tiprelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Admin credential checks and the admin bearer token.
//!
//! The token is the base64 encoding of `username:password`. It is validated
//! by decoding it and comparing against the persisted credential, so changing
//! the admin password invalidates every outstanding token.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::debug;

use tiprelay_core::StateStore;

/// Encode an admin token for `username` and `password`.
pub fn encode_token(username: &str, password: &str) -> String {
    STANDARD.encode(format!("{username}:{password}"))
}

/// Decode an admin token into `(username, password)`.
///
/// The split happens at the first `:`, so passwords may contain colons.
/// Anything that is not valid base64 of UTF-8 containing a colon is `None`.
pub fn decode_token(token: &str) -> Option<(String, String)> {
    let bytes = STANDARD.decode(token.trim()).ok()?;
    let decoded = String::from_utf8(bytes).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

/// Verifies admin logins against the persisted credential.
#[derive(Clone)]
pub struct AdminAuth {
    store: Arc<dyn StateStore>,
}

impl AdminAuth {
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self { store }
    }

    /// True when both fields equal the persisted admin credential.
    pub async fn authenticate(&self, username: &str, password: &str) -> bool {
        if username.is_empty() {
            return false;
        }
        let state = self.store.load().await;
        state.admin.username == username && state.admin.password == password
    }

    /// Token for a successful login, `None` otherwise.
    pub async fn issue_token(&self, username: &str, password: &str) -> Option<String> {
        if self.authenticate(username, password).await {
            Some(encode_token(username, password))
        } else {
            debug!(username, "admin login rejected");
            None
        }
    }

    /// True when the token decodes to the current admin credential.
    pub async fn validate_token(&self, token: &str) -> bool {
        match decode_token(token) {
            Some((username, password)) => self.authenticate(&username, &password).await,
            None => false,
        }
    }

    /// Username of the persisted admin credential.
    pub async fn username(&self) -> String {
        self.store.load().await.admin.username
    }
}

impl std::fmt::Debug for AdminAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminAuth").finish_non_exhaustive()
    }
}
