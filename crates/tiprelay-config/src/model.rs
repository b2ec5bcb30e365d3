// SPDX-FileCopyrightText: 2026 Tiprelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the tiprelay donation relay.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level tiprelay configuration.
///
/// Loaded from `tiprelay.toml` and the process environment. Every section is
/// optional; only the `games` slots carry values that have no usable default.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RelayConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// State file location.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Admin credential seeded into a fresh state file.
    #[serde(default)]
    pub admin: AdminConfig,

    /// Outbound messaging client settings.
    #[serde(default)]
    pub forwarder: ForwarderConfig,

    /// Donation target slots keyed by slot id (`game1`, `game2`, ...).
    #[serde(default)]
    pub games: BTreeMap<String, GameSlotConfig>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            admin: AdminConfig::default(),
            forwarder: ForwarderConfig::default(),
            games: BTreeMap::new(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

/// State file configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Mounted volume directory. `None` keeps the state file in the
    /// working directory, which does not survive redeploys on most hosts.
    #[serde(default)]
    pub volume_path: Option<String>,

    /// State file name inside the volume (or working) directory.
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            volume_path: None,
            file_name: default_file_name(),
        }
    }
}

fn default_file_name() -> String {
    "users.json".to_string()
}

impl StorageConfig {
    /// Full path of the state file.
    pub fn state_path(&self) -> PathBuf {
        match self.volume_path.as_deref().filter(|v| !v.trim().is_empty()) {
            Some(volume) => PathBuf::from(volume).join(&self.file_name),
            None => PathBuf::from(".").join(&self.file_name),
        }
    }

    /// Whether the state file lives on a mounted volume.
    pub fn is_persistent(&self) -> bool {
        self.volume_path
            .as_deref()
            .is_some_and(|v| !v.trim().is_empty())
    }
}

/// Seed values for the admin credential.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AdminConfig {
    #[serde(default = "default_admin_username")]
    pub username: String,

    #[serde(default = "default_admin_password")]
    pub password: String,
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .finish()
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: default_admin_username(),
            password: default_admin_password(),
        }
    }
}

fn default_admin_username() -> String {
    "admin".to_string()
}

fn default_admin_password() -> String {
    "admin123".to_string()
}

/// Outbound messaging client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ForwarderConfig {
    /// Base URL of the game platform's open cloud API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ForwarderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://apis.roblox.com".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

/// Topic used when a slot does not name one.
pub const DEFAULT_TOPIC: &str = "ArchieDonationIDR";

/// One environment-declared donation target slot.
///
/// Every field is optional here; the registry decides whether the slot is
/// complete enough to become an active target.
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GameSlotConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub universe_id: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub webhook_secret: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub saweria_token: Option<String>,
    #[serde(default)]
    pub socialbuzz_token: Option<String>,
}

impl GameSlotConfig {
    /// Names of required fields that are absent or empty.
    pub fn missing_required(&self) -> Vec<&'static str> {
        [
            ("universe_id", &self.universe_id),
            ("api_key", &self.api_key),
            ("webhook_secret", &self.webhook_secret),
            ("password", &self.password),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().is_none_or(|v| v.trim().is_empty()))
        .map(|(name, _)| name)
        .collect()
    }

    /// Configured topic, or [`DEFAULT_TOPIC`].
    pub fn topic_or_default(&self) -> String {
        non_empty(&self.topic).unwrap_or_else(|| DEFAULT_TOPIC.to_string())
    }

    /// Configured name, or `Game N` derived from the slot id.
    pub fn name_or_default(&self, slot_id: &str) -> String {
        non_empty(&self.name).unwrap_or_else(|| match slot_number(slot_id) {
            Some(n) => format!("Game {n}"),
            None => slot_id.to_string(),
        })
    }
}

impl std::fmt::Debug for GameSlotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "[redacted]");
        f.debug_struct("GameSlotConfig")
            .field("name", &self.name)
            .field("universe_id", &self.universe_id)
            .field("api_key", &redact(&self.api_key))
            .field("topic", &self.topic)
            .field("webhook_secret", &redact(&self.webhook_secret))
            .field("password", &redact(&self.password))
            .field("saweria_token", &redact(&self.saweria_token))
            .field("socialbuzz_token", &redact(&self.socialbuzz_token))
            .finish()
    }
}

/// Numeric suffix of a `gameN` slot id.
pub fn slot_number(slot_id: &str) -> Option<u32> {
    slot_id.strip_prefix("game")?.parse().ok()
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
