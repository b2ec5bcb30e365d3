// SPDX-FileCopyrightText: 2026 Tiprelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Merge order (later overrides earlier):
//! 1. Compiled defaults
//! 2. `./tiprelay.toml`
//! 3. Deployment variables (`PORT`, `VOLUME_PATH`, `ADMIN_*`, `GAME_<N>_*`)
//! 4. `TIPRELAY_*` environment variables
//!
//! String-typed `TIPRELAY_*` keys bypass figment's value parsing so an
//! all-digit password or host stays a string.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde_json::{Map, Value};

use crate::model::RelayConfig;

/// Local config file name.
pub const CONFIG_FILE: &str = "tiprelay.toml";

/// Load configuration from `./tiprelay.toml` and the process environment.
pub fn load_config() -> Result<RelayConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no environment).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<RelayConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RelayConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a TOML string plus an explicit set of deployment
/// variables, ignoring the process environment.
pub fn load_config_with_vars<I>(toml_content: &str, vars: I) -> Result<RelayConfig, figment::Error>
where
    I: IntoIterator<Item = (String, String)>,
{
    Figment::new()
        .merge(Serialized::defaults(RelayConfig::default()))
        .merge(Toml::string(toml_content))
        .merge(Serialized::defaults(deployment_overrides(vars)))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<RelayConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RelayConfig::default()))
        .merge(Toml::file(path))
        .merge(Serialized::defaults(deployment_overrides(std::env::vars())))
        .merge(env_provider())
        .merge(Serialized::defaults(prefixed_string_overrides(std::env::vars())))
        .extract()
}

/// Build the Figment used for config loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(RelayConfig::default()))
        .merge(Toml::file(CONFIG_FILE))
        .merge(Serialized::defaults(deployment_overrides(std::env::vars())))
        .merge(env_provider())
        .merge(Serialized::defaults(prefixed_string_overrides(std::env::vars())))
}

/// Translate the unprefixed deployment variables into a config overlay.
///
/// Values are kept as strings: passwords, API keys, and universe ids are
/// frequently all-digit and must not be re-typed (`0123` stays `0123`).
/// `PORT` is the only numeric key; an unparsable value is passed through as
/// a string so extraction reports it as an invalid type.
pub fn deployment_overrides<I>(vars: I) -> Value
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut server = Map::new();
    let mut storage = Map::new();
    let mut admin = Map::new();
    let mut games: Map<String, Value> = Map::new();

    for (key, value) in vars {
        match key.as_str() {
            "PORT" => {
                let port = value
                    .trim()
                    .parse::<u16>()
                    .map(Value::from)
                    .unwrap_or_else(|_| Value::from(value.clone()));
                server.insert("port".into(), port);
            }
            "VOLUME_PATH" => {
                storage.insert("volume_path".into(), Value::from(value));
            }
            "ADMIN_USERNAME" => {
                admin.insert("username".into(), Value::from(value));
            }
            "ADMIN_PASSWORD" => {
                admin.insert("password".into(), Value::from(value));
            }
            _ => {
                if let Some((slot, field)) = parse_game_var(&key) {
                    let entry = games
                        .entry(slot)
                        .or_insert_with(|| Value::Object(Map::new()));
                    if let Value::Object(fields) = entry {
                        fields.insert(field, Value::from(value));
                    }
                }
            }
        }
    }

    let mut overlay = Map::new();
    for (section, values) in [("server", server), ("storage", storage), ("admin", admin)] {
        if !values.is_empty() {
            overlay.insert(section.into(), Value::Object(values));
        }
    }
    if !games.is_empty() {
        overlay.insert("games".into(), Value::Object(games));
    }
    Value::Object(overlay)
}

/// Split `GAME_<N>_<FIELD>` into (`game<N>`, `<field>`).
fn parse_game_var(key: &str) -> Option<(String, String)> {
    let rest = key.strip_prefix("GAME_")?;
    let (number, field) = rest.split_once('_')?;
    if number.is_empty() || field.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let number: u32 = number.parse().ok()?;
    if number == 0 {
        return None;
    }
    Some((format!("game{number}"), field.to_ascii_lowercase()))
}

/// Dotted config keys whose `TIPRELAY_*` value is always taken verbatim.
const STRING_KEYS: [&str; 7] = [
    "log_level",
    "server.host",
    "storage.volume_path",
    "storage.file_name",
    "admin.username",
    "admin.password",
    "forwarder.base_url",
];

/// Map a `TIPRELAY_` variable name (prefix stripped) to its dotted key.
///
/// Figment hands `map` the variable's original casing, so the name is
/// lowercased before the section prefixes are rewritten.
fn env_key(name: &str) -> String {
    name.to_ascii_lowercase()
        .replacen("server_", "server.", 1)
        .replacen("storage_", "storage.", 1)
        .replacen("admin_", "admin.", 1)
        .replacen("forwarder_", "forwarder.", 1)
}

/// Create the `TIPRELAY_` environment provider for the typed keys.
///
/// Uses explicit key mapping, NOT `Env::split("_")`, so underscore-containing
/// keys stay intact: `TIPRELAY_FORWARDER_BASE_URL` maps to `forwarder.base_url`.
/// Keys in [`STRING_KEYS`] are left to [`prefixed_string_overrides`].
fn env_provider() -> Env {
    Env::prefixed("TIPRELAY_").filter_map(|key| {
        let mapped = env_key(key.as_str());
        (!STRING_KEYS.contains(&mapped.as_str())).then(|| mapped.into())
    })
}

/// Overlay of the string-typed `TIPRELAY_*` variables, values untouched.
pub fn prefixed_string_overrides<I>(vars: I) -> Value
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut overlay = Map::new();
    for (name, value) in vars {
        let Some(rest) = name.strip_prefix("TIPRELAY_") else {
            continue;
        };
        let key = env_key(rest);
        if !STRING_KEYS.contains(&key.as_str()) {
            continue;
        }
        match key.split_once('.') {
            Some((section, field)) => {
                let entry = overlay
                    .entry(section)
                    .or_insert_with(|| Value::Object(Map::new()));
                if let Value::Object(fields) = entry {
                    fields.insert(field.into(), Value::from(value));
                }
            }
            None => {
                overlay.insert(key, Value::from(value));
            }
        }
    }
    Value::Object(overlay)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn parse_game_var_maps_slot_and_field() {
        assert_eq!(
            parse_game_var("GAME_1_UNIVERSE_ID"),
            Some(("game1".into(), "universe_id".into()))
        );
        assert_eq!(
            parse_game_var("GAME_12_SOCIALBUZZ_TOKEN"),
            Some(("game12".into(), "socialbuzz_token".into()))
        );
    }

    #[test]
    fn parse_game_var_rejects_other_keys() {
        assert_eq!(parse_game_var("GAME_X_API_KEY"), None);
        assert_eq!(parse_game_var("GAME__API_KEY"), None);
        assert_eq!(parse_game_var("GAME_0_API_KEY"), None);
        assert_eq!(parse_game_var("GAMES"), None);
        assert_eq!(parse_game_var("PATH"), None);
    }

    #[test]
    fn overrides_keep_digit_strings() {
        let overlay = deployment_overrides(vars(&[
            ("GAME_1_PASSWORD", "0123456"),
            ("GAME_1_UNIVERSE_ID", "987654321"),
        ]));
        assert_eq!(overlay["games"]["game1"]["password"], "0123456");
        assert_eq!(overlay["games"]["game1"]["universe_id"], "987654321");
    }

    #[test]
    fn overrides_skip_unrelated_vars() {
        let overlay = deployment_overrides(vars(&[("HOME", "/root"), ("PATH", "/bin")]));
        assert_eq!(overlay, json!({}));
    }

    #[test]
    fn env_key_lowercases_before_mapping() {
        assert_eq!(env_key("FORWARDER_TIMEOUT_SECS"), "forwarder.timeout_secs");
        assert_eq!(env_key("ADMIN_PASSWORD"), "admin.password");
        assert_eq!(env_key("LOG_LEVEL"), "log_level");
    }

    #[test]
    fn prefixed_strings_stay_strings() {
        let overlay = prefixed_string_overrides(vars(&[
            ("TIPRELAY_ADMIN_PASSWORD", "123456"),
            ("TIPRELAY_LOG_LEVEL", "debug"),
            ("TIPRELAY_FORWARDER_TIMEOUT_SECS", "9"),
            ("ADMIN_USERNAME", "owner"),
        ]));
        assert_eq!(
            overlay,
            json!({ "admin": { "password": "123456" }, "log_level": "debug" })
        );
    }

    #[test]
    fn port_override_is_numeric() {
        let overlay = deployment_overrides(vars(&[("PORT", "8080")]));
        assert_eq!(overlay["server"]["port"], 8080);
    }
}
