// SPDX-FileCopyrightText: 2026 Tiprelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the tiprelay crates.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Username seeded into a fresh state file when nothing else is configured.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

/// Password seeded into a fresh state file when nothing else is configured.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Donation platform a [`DonationEvent`] originated from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum DonationSource {
    Saweria,
    SocialBuzz,
    Test,
}

/// One configured game/channel receiving forwarded donations.
///
/// Built by the registry from an environment slot merged with the persisted
/// record of the same `id`. The API key never leaves this struct except as
/// an outbound request header.
pub struct DonationTarget {
    /// Stable slot identifier (`game1`, `game2`, ...).
    pub id: String,
    /// Human-readable game name.
    pub display_name: String,
    /// Messaging namespace (universe id) on the game platform.
    pub universe_id: String,
    /// Messaging topic within the universe.
    pub topic: String,
    /// Credential for outbound messaging calls.
    pub api_key: SecretString,
    /// Unguessable path segment routing inbound webhooks to this target.
    pub webhook_path: String,
    /// Optional shared secret for Saweria pushes.
    pub saweria_token: Option<String>,
    /// Optional shared secret for SocialBuzz pushes.
    pub socialbuzz_token: Option<String>,
    /// Dashboard password, possibly overridden by the persisted record.
    pub access_password: String,
    pub last_active_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl DonationTarget {
    /// Returns the configured inbound token for a provider, if any.
    ///
    /// Synthetic test donations never carry a provider token.
    pub fn provider_token(&self, source: DonationSource) -> Option<&str> {
        let token = match source {
            DonationSource::Saweria => self.saweria_token.as_deref(),
            DonationSource::SocialBuzz => self.socialbuzz_token.as_deref(),
            DonationSource::Test => None,
        };
        token.filter(|t| !t.is_empty())
    }
}

impl std::fmt::Debug for DonationTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DonationTarget")
            .field("id", &self.id)
            .field("display_name", &self.display_name)
            .field("universe_id", &self.universe_id)
            .field("topic", &self.topic)
            .field("api_key", &"[redacted]")
            .field("webhook_path", &"[redacted]")
            .field("saweria_token", &self.saweria_token.as_ref().map(|_| "[redacted]"))
            .field(
                "socialbuzz_token",
                &self.socialbuzz_token.as_ref().map(|_| "[redacted]"),
            )
            .field("access_password", &"[redacted]")
            .field("last_active_at", &self.last_active_at)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Canonical donation event relayed to the game platform.
///
/// Serialized with camelCase keys; this JSON is the message body the game
/// servers receive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationEvent {
    /// Best-effort in-game handle.
    pub username: String,
    /// Name the donor entered on the donation platform.
    pub display_name: String,
    /// Amount in the smallest currency unit, truncated.
    pub amount: u64,
    /// Unix timestamp in seconds.
    pub timestamp: i64,
    pub source: DonationSource,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Result of a successful outbound messaging call.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardOutcome {
    /// Upstream HTTP status (always 2xx).
    pub status: u16,
    /// Upstream response body, `Null` when empty or not JSON.
    pub body: serde_json::Value,
}

/// The single admin username/password pair.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminCredential {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for AdminCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredential")
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .finish()
    }
}

impl Default for AdminCredential {
    fn default() -> Self {
        Self {
            username: DEFAULT_ADMIN_USERNAME.to_string(),
            password: DEFAULT_ADMIN_PASSWORD.to_string(),
        }
    }
}

/// Mutable per-game fields kept in the state file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_active: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Full contents of the state file.
///
/// `Default` is the hard fallback used when the file cannot be read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    pub admin: AdminCredential,
    #[serde(default)]
    pub games: Vec<GameRecord>,
}

impl PersistedState {
    /// A fresh state with the given admin credential and no games.
    pub fn seeded(admin: AdminCredential) -> Self {
        Self {
            admin,
            games: Vec::new(),
        }
    }

    pub fn game(&self, id: &str) -> Option<&GameRecord> {
        self.games.iter().find(|g| g.id == id)
    }

    pub fn game_mut(&mut self, id: &str) -> Option<&mut GameRecord> {
        self.games.iter_mut().find(|g| g.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn sample_target() -> DonationTarget {
        let now = Utc::now();
        DonationTarget {
            id: "game1".into(),
            display_name: "Game 1".into(),
            universe_id: "12345".into(),
            topic: "ArchieDonationIDR".into(),
            api_key: SecretString::from("super-secret-key".to_string()),
            webhook_path: "hook-secret".into(),
            saweria_token: Some("sawer-token".into()),
            socialbuzz_token: Some(String::new()),
            access_password: "hunter22".into(),
            last_active_at: now,
            created_at: now,
        }
    }

    #[test]
    fn donation_source_display_round_trip() {
        for source in [
            DonationSource::Saweria,
            DonationSource::SocialBuzz,
            DonationSource::Test,
        ] {
            let parsed = DonationSource::from_str(&source.to_string()).unwrap();
            assert_eq!(parsed, source);
        }
        assert_eq!(DonationSource::SocialBuzz.to_string(), "SocialBuzz");
    }

    #[test]
    fn donation_event_serializes_camel_case() {
        let event = DonationEvent {
            username: "budi_99".into(),
            display_name: "Budi".into(),
            amount: 19999,
            timestamp: 1_700_000_000,
            source: DonationSource::Saweria,
            message: "makasih".into(),
            email: None,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["displayName"], "Budi");
        assert_eq!(json["source"], "Saweria");
        assert_eq!(json["amount"], 19999);
        assert!(json.get("email").is_none());
    }

    #[test]
    fn provider_token_treats_empty_as_absent() {
        let target = sample_target();
        assert_eq!(target.provider_token(DonationSource::Saweria), Some("sawer-token"));
        assert_eq!(target.provider_token(DonationSource::SocialBuzz), None);
        assert_eq!(target.provider_token(DonationSource::Test), None);
    }

    #[test]
    fn target_debug_redacts_secrets() {
        let debug = format!("{:?}", sample_target());
        assert!(!debug.contains("super-secret-key"));
        assert!(!debug.contains("hunter22"));
        assert!(!debug.contains("hook-secret"));
        assert!(!debug.contains("sawer-token"));
        assert!(debug.contains("game1"));
    }

    #[test]
    fn persisted_state_ignores_legacy_fields() {
        let json = r#"{
            "admin": {"username": "root", "password": "toor"},
            "games": [{
                "id": "game1",
                "name": "Old Name",
                "universeId": "1",
                "apiKey": "leaked",
                "password": "pw1234",
                "lastActive": "2024-01-01T00:00:00.000Z",
                "createdAt": "2023-12-31T00:00:00.000Z"
            }]
        }"#;
        let state: PersistedState = serde_json::from_str(json).unwrap();
        assert_eq!(state.admin.username, "root");
        let game = state.game("game1").unwrap();
        assert_eq!(game.password.as_deref(), Some("pw1234"));
        assert!(game.last_active.is_some());

        let out = serde_json::to_string(&state).unwrap();
        assert!(!out.contains("leaked"));
        assert!(out.contains("lastActive"));
    }

    #[test]
    fn default_state_is_hard_fallback() {
        let state = PersistedState::default();
        assert_eq!(state.admin.username, "admin");
        assert_eq!(state.admin.password, "admin123");
        assert!(state.games.is_empty());
    }
}
