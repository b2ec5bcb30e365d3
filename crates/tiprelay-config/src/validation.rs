// SPDX-FileCopyrightText: 2026 Tiprelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Incomplete game slots are not errors here: the registry drops them and
//! logs which fields are missing.

use crate::diagnostic::ConfigError;
use crate::model::RelayConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.server.host.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    }

    if config.server.port == 0 {
        errors.push(ConfigError::Validation {
            message: "server.port must be between 1 and 65535".to_string(),
        });
    }

    if config.storage.file_name.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.file_name must not be empty".to_string(),
        });
    }

    if config.admin.username.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "admin.username must not be empty".to_string(),
        });
    }

    let base_url = config.forwarder.base_url.trim();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        errors.push(ConfigError::Validation {
            message: format!(
                "forwarder.base_url `{base_url}` must start with http:// or https://"
            ),
        });
    }

    if config.forwarder.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "forwarder.timeout_secs must be at least 1".to_string(),
        });
    }

    for slot_id in config.games.keys() {
        if crate::model::slot_number(slot_id).is_none() {
            errors.push(ConfigError::Validation {
                message: format!("games.{slot_id}: slot ids must look like `game1`, `game2`, ..."),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
