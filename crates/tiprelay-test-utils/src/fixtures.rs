// SPDX-FileCopyrightText: 2026 Tiprelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Game slot and target fixtures.
//!
//! Slot `n` uses universe `n000n`, webhook path `hook-n`, and password
//! `password-n`, so tests can derive secrets from the slot number.

use std::collections::BTreeMap;

use chrono::Utc;
use secrecy::SecretString;

use tiprelay_config::model::{DEFAULT_TOPIC, GameSlotConfig};
use tiprelay_core::DonationTarget;

/// A slot with every required field set.
pub fn complete_slot(n: u32) -> GameSlotConfig {
    GameSlotConfig {
        name: Some(format!("Test Game {n}")),
        universe_id: Some(format!("{n}000{n}")),
        api_key: Some(format!("api-key-{n}")),
        topic: None,
        webhook_secret: Some(format!("hook-{n}")),
        password: Some(format!("password-{n}")),
        saweria_token: None,
        socialbuzz_token: None,
    }
}

/// Complete slots keyed `game<n>` for each number given.
pub fn slots(numbers: &[u32]) -> BTreeMap<String, GameSlotConfig> {
    numbers
        .iter()
        .map(|n| (format!("game{n}"), complete_slot(*n)))
        .collect()
}

/// The target the registry would build from [`complete_slot`] with no
/// persisted record.
pub fn sample_target(n: u32) -> DonationTarget {
    let now = Utc::now();
    DonationTarget {
        id: format!("game{n}"),
        display_name: format!("Test Game {n}"),
        universe_id: format!("{n}000{n}"),
        topic: DEFAULT_TOPIC.to_string(),
        api_key: SecretString::from(format!("api-key-{n}")),
        webhook_path: format!("hook-{n}"),
        saweria_token: None,
        socialbuzz_token: None,
        access_password: format!("password-{n}"),
        last_active_at: now,
        created_at: now,
    }
}
