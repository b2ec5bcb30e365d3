// SPDX-FileCopyrightText: 2026 Tiprelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the tiprelay configuration system.

use tiprelay_config::diagnostic::ConfigError;
use tiprelay_config::model::{DEFAULT_TOPIC, RelayConfig};
use tiprelay_config::{
    load_and_validate_str, load_config_from_path, load_config_from_str, load_config_with_vars,
};

fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_relay_config() {
    let toml = r#"
log_level = "debug"

[server]
host = "127.0.0.1"
port = 8080

[storage]
volume_path = "/data"
file_name = "state.json"

[admin]
username = "boss"
password = "s3cret!"

[forwarder]
base_url = "http://localhost:9000"
timeout_secs = 3

[games.game1]
name = "Obby"
universe_id = "111"
api_key = "key-1"
topic = "Donations"
webhook_secret = "abc123"
password = "pass-1"
saweria_token = "sawer"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.log_level, "debug");
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.storage.volume_path.as_deref(), Some("/data"));
    assert_eq!(config.storage.file_name, "state.json");
    assert_eq!(config.admin.username, "boss");
    assert_eq!(config.forwarder.base_url, "http://localhost:9000");
    assert_eq!(config.forwarder.timeout_secs, 3);

    let slot = &config.games["game1"];
    assert_eq!(slot.name.as_deref(), Some("Obby"));
    assert_eq!(slot.topic_or_default(), "Donations");
    assert_eq!(slot.saweria_token.as_deref(), Some("sawer"));
    assert!(slot.socialbuzz_token.is_none());
    assert!(slot.missing_required().is_empty());
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_optional_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.log_level, "info");
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 3000);
    assert!(config.storage.volume_path.is_none());
    assert_eq!(config.storage.file_name, "users.json");
    assert_eq!(config.admin.username, "admin");
    assert_eq!(config.admin.password, "admin123");
    assert_eq!(config.forwarder.base_url, "https://apis.roblox.com");
    assert_eq!(config.forwarder.timeout_secs, 10);
    assert!(config.games.is_empty());
}

/// Unknown field in a game slot is rejected.
#[test]
fn unknown_field_in_game_slot_produces_error() {
    let toml = r#"
[games.game1]
api_kye = "abc"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("api_kye"),
        "error should mention unknown field, got: {err_str}"
    );
}

/// Unknown keys become diagnostics with a suggestion.
#[test]
fn unknown_key_diagnostic_has_suggestion() {
    let toml = r#"
[server]
prot = 8080
"#;

    let errors = load_and_validate_str(toml).expect_err("should fail");
    let found = errors.iter().any(|e| match e {
        ConfigError::UnknownKey { suggestion, .. } => suggestion.as_deref() == Some("port"),
        _ => false,
    });
    assert!(found, "expected UnknownKey suggesting `port`, got: {errors:?}");
}

/// Deployment variables populate slots keyed `game<N>`.
#[test]
fn game_env_vars_populate_slots() {
    let config = load_config_with_vars(
        "",
        vars(&[
            ("GAME_1_UNIVERSE_ID", "111"),
            ("GAME_1_API_KEY", "key-1"),
            ("GAME_1_WEBHOOK_SECRET", "hook-1"),
            ("GAME_1_PASSWORD", "000111"),
            ("GAME_2_NAME", "Half Configured"),
            ("HOME", "/root"),
        ]),
    )
    .expect("env vars should merge");

    assert_eq!(config.games.len(), 2);
    let first = &config.games["game1"];
    assert_eq!(first.password.as_deref(), Some("000111"));
    assert_eq!(first.universe_id.as_deref(), Some("111"));
    assert_eq!(first.topic_or_default(), DEFAULT_TOPIC);
    assert_eq!(first.name_or_default("game1"), "Game 1");

    let second = &config.games["game2"];
    assert_eq!(second.name_or_default("game2"), "Half Configured");
    assert_eq!(second.missing_required().len(), 4);
}

/// Environment values override the TOML file.
#[test]
fn env_vars_override_toml() {
    let toml = r#"
[server]
port = 4000

[admin]
username = "from-toml"

[games.game1]
universe_id = "from-toml"
topic = "TomlTopic"
"#;

    let config = load_config_with_vars(
        toml,
        vars(&[
            ("PORT", "5000"),
            ("ADMIN_USERNAME", "from-env"),
            ("GAME_1_UNIVERSE_ID", "from-env"),
            ("VOLUME_PATH", "/mnt/volume"),
        ]),
    )
    .expect("should merge");

    assert_eq!(config.server.port, 5000);
    assert_eq!(config.admin.username, "from-env");
    assert_eq!(config.storage.volume_path.as_deref(), Some("/mnt/volume"));
    let slot = &config.games["game1"];
    assert_eq!(slot.universe_id.as_deref(), Some("from-env"));
    assert_eq!(slot.topic.as_deref(), Some("TomlTopic"));
}

/// A non-numeric PORT is reported, not silently ignored.
#[test]
fn invalid_port_is_an_error() {
    let result = load_config_with_vars("", vars(&[("PORT", "eighty")]));
    assert!(result.is_err());
}

/// Dotted overrides behave like the prefixed environment provider.
#[test]
fn dotted_override_sets_forwarder_base_url() {
    use figment::{Figment, providers::Serialized};

    let config: RelayConfig = Figment::new()
        .merge(Serialized::defaults(RelayConfig::default()))
        .merge(("forwarder.base_url", "http://127.0.0.1:1234"))
        .extract()
        .expect("should set base_url via dot notation");

    assert_eq!(config.forwarder.base_url, "http://127.0.0.1:1234");
}

/// Validation errors surface through the high-level entry point.
#[test]
fn validation_errors_surface() {
    let toml = r#"
[forwarder]
timeout_secs = 0
"#;
    let errors = load_and_validate_str(toml).expect_err("zero timeout is invalid");
    assert!(errors.iter().any(
        |e| matches!(e, ConfigError::Validation { message } if message.contains("timeout_secs"))
    ));
}

/// The process environment is layered over a config file on disk.
#[test]
#[serial_test::serial]
fn process_env_overrides_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tiprelay.toml");
    std::fs::write(
        &path,
        "[games.game7]\nname = \"From File\"\nuniverse_id = \"111\"\n",
    )
    .unwrap();

    // SAFETY: serialized with every other test touching the environment.
    unsafe {
        std::env::set_var("GAME_7_UNIVERSE_ID", "0777");
        std::env::set_var("TIPRELAY_FORWARDER_TIMEOUT_SECS", "9");
        std::env::set_var("TIPRELAY_ADMIN_PASSWORD", "123456");
    }
    let result = load_config_from_path(&path);
    unsafe {
        std::env::remove_var("GAME_7_UNIVERSE_ID");
        std::env::remove_var("TIPRELAY_FORWARDER_TIMEOUT_SECS");
        std::env::remove_var("TIPRELAY_ADMIN_PASSWORD");
    }

    let config = result.expect("file plus env should load");
    let slot = &config.games["game7"];
    assert_eq!(slot.name.as_deref(), Some("From File"));
    assert_eq!(slot.universe_id.as_deref(), Some("0777"));
    assert_eq!(config.forwarder.timeout_secs, 9);
    assert_eq!(config.admin.password, "123456");
}

/// A missing config file is not an error; defaults and env apply.
#[test]
#[serial_test::serial]
fn missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_config_from_path(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.admin.username, "admin");
}
