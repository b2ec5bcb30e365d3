// SPDX-FileCopyrightText: 2026 Tiprelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider payload normalization.
//!
//! Providers send loosely typed JSON. Field resolution follows JavaScript
//! truthiness: `null`, `false`, `0` and `""` count as absent and fall
//! through to the next candidate field or the default.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use tiprelay_core::{DonationEvent, DonationSource, RelayError, extract_username};

/// Donor name used when a payload carries none.
pub const ANONYMOUS: &str = "Anonymous";

/// Amount sent by the test endpoint when none (or a non-positive one) is given.
pub const TEST_DEFAULT_AMOUNT: u64 = 25_000;

const SOCIALBUZZ_MESSAGE_FIELDS: &[&str] = &["message", "supporter_message", "note", "comment"];
const SOCIALBUZZ_NAME_FIELDS: &[&str] = &["supporter_name", "name", "donator_name"];
const SOCIALBUZZ_AMOUNT_FIELDS: &[&str] = &["amount", "donation_amount", "amount_raw"];
const SOCIALBUZZ_EMAIL_FIELDS: &[&str] = &["supporter_email", "email"];

static LEADING_INTEGER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*([+-]?\d+)").unwrap());

/// Outcome of normalizing a Saweria push.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    /// Not a donation (or no payload); acknowledge without forwarding.
    Ignored,
    Donation(DonationEvent),
}

/// Normalize a Saweria webhook payload.
///
/// Anything other than an object with `type == "donation"` is
/// [`Normalized::Ignored`].
pub fn normalize_saweria(payload: Option<&Value>, timestamp: i64) -> Normalized {
    let Some(payload) = payload.filter(|p| p.is_object()) else {
        return Normalized::Ignored;
    };
    if payload.get("type").and_then(Value::as_str) != Some("donation") {
        debug!(kind = ?payload.get("type"), "ignoring non-donation saweria event");
        return Normalized::Ignored;
    }

    let display_name = text_or(payload, &["donator_name"], ANONYMOUS);
    let message = text_or(payload, &["message"], "");

    Normalized::Donation(DonationEvent {
        username: extract_username(&message, &display_name),
        display_name,
        amount: first_truthy(payload, &["amount_raw"]).map_or(0, floor_amount),
        timestamp,
        source: DonationSource::Saweria,
        message,
        email: Some(text_or(payload, &["donator_email"], "")),
    })
}

/// Normalize a SocialBuzz webhook payload.
///
/// A missing or non-object payload is a validation error.
pub fn normalize_socialbuzz(
    payload: Option<&Value>,
    timestamp: i64,
) -> Result<DonationEvent, RelayError> {
    let Some(payload) = payload.filter(|p| p.is_object()) else {
        return Err(RelayError::Validation("No payload".to_string()));
    };

    let message = text_or(payload, SOCIALBUZZ_MESSAGE_FIELDS, "");
    let display_name = text_or(payload, SOCIALBUZZ_NAME_FIELDS, ANONYMOUS);
    let username = extract_username(&message, &display_name);
    debug!(%message, name = %display_name, %username, "socialbuzz fields resolved");

    Ok(DonationEvent {
        username,
        display_name,
        amount: first_truthy(payload, SOCIALBUZZ_AMOUNT_FIELDS).map_or(0, floor_amount),
        timestamp,
        source: DonationSource::SocialBuzz,
        message,
        email: Some(text_or(payload, SOCIALBUZZ_EMAIL_FIELDS, "")),
    })
}

/// Build the synthetic donation sent by the test endpoint.
///
/// `body` may supply `username` and `amount`; the amount accepts a number
/// or a string with a leading integer.
pub fn test_donation(body: Option<&Value>, timestamp: i64) -> DonationEvent {
    let username = body
        .map(|b| text_or(b, &["username"], "TestUser"))
        .unwrap_or_else(|| "TestUser".to_string());
    let amount = body
        .and_then(|b| b.get("amount"))
        .and_then(parse_int)
        .filter(|n| *n > 0)
        .map_or(TEST_DEFAULT_AMOUNT, |n| n as u64);

    DonationEvent {
        username,
        display_name: "Test Donator".to_string(),
        amount,
        timestamp,
        source: DonationSource::Test,
        message: "Test donation".to_string(),
        email: None,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn first_truthy<'a>(payload: &'a Value, fields: &[&str]) -> Option<&'a Value> {
    fields
        .iter()
        .filter_map(|field| payload.get(field))
        .find(|value| is_truthy(value))
}

fn text_or(payload: &Value, fields: &[&str], default: &str) -> String {
    match first_truthy(payload, fields) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => default.to_string(),
    }
}

/// Floor a numeric or numeric-string amount; anything unusable is 0.
fn floor_amount(value: &Value) -> u64 {
    let raw = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match raw {
        Some(f) if f.is_finite() && f > 0.0 => f.floor() as u64,
        _ => 0,
    }
}

fn parse_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => LEADING_INTEGER
            .captures(s)
            .and_then(|c| c[1].parse().ok()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    const TS: i64 = 1_700_000_000;

    fn donation(normalized: Normalized) -> DonationEvent {
        match normalized {
            Normalized::Donation(event) => event,
            Normalized::Ignored => panic!("expected a donation"),
        }
    }

    #[test]
    fn saweria_donation_is_normalized() {
        let payload = json!({
            "type": "donation",
            "amount_raw": 19999.9,
            "donator_name": "Budi",
            "message": "[budi_rblx] semangat!",
            "donator_email": "budi@example.com"
        });
        let event = donation(normalize_saweria(Some(&payload), TS));
        assert_eq!(event.username, "budi_rblx");
        assert_eq!(event.display_name, "Budi");
        assert_eq!(event.amount, 19999);
        assert_eq!(event.timestamp, TS);
        assert_eq!(event.source, DonationSource::Saweria);
        assert_eq!(event.message, "[budi_rblx] semangat!");
        assert_eq!(event.email.as_deref(), Some("budi@example.com"));
    }

    #[test]
    fn saweria_defaults_apply() {
        let payload = json!({ "type": "donation" });
        let event = donation(normalize_saweria(Some(&payload), TS));
        assert_eq!(event.username, ANONYMOUS);
        assert_eq!(event.display_name, ANONYMOUS);
        assert_eq!(event.amount, 0);
        assert_eq!(event.message, "");
        assert_eq!(event.email.as_deref(), Some(""));
    }

    #[test]
    fn saweria_non_donation_is_ignored() {
        let payload = json!({ "type": "subscription", "amount_raw": 5000 });
        assert_eq!(normalize_saweria(Some(&payload), TS), Normalized::Ignored);
        assert_eq!(normalize_saweria(None, TS), Normalized::Ignored);
        assert_eq!(normalize_saweria(Some(&json!("donation")), TS), Normalized::Ignored);
    }

    #[test]
    fn socialbuzz_uses_fallback_chains() {
        let payload = json!({
            "message": "",
            "supporter_message": "@player_1 gg",
            "supporter_name": null,
            "name": "Sari",
            "amount": 0,
            "donation_amount": "15000",
            "email": "sari@example.com"
        });
        let event = normalize_socialbuzz(Some(&payload), TS).unwrap();
        assert_eq!(event.message, "@player_1 gg");
        assert_eq!(event.username, "player_1");
        assert_eq!(event.display_name, "Sari");
        assert_eq!(event.amount, 15000);
        assert_eq!(event.source, DonationSource::SocialBuzz);
        assert_eq!(event.email.as_deref(), Some("sari@example.com"));
    }

    #[test]
    fn socialbuzz_empty_object_uses_defaults() {
        let event = normalize_socialbuzz(Some(&json!({})), TS).unwrap();
        assert_eq!(event.display_name, ANONYMOUS);
        assert_eq!(event.username, ANONYMOUS);
        assert_eq!(event.amount, 0);
    }

    #[test]
    fn socialbuzz_missing_payload_is_rejected() {
        for payload in [None, Some(json!(null)), Some(json!([1, 2])), Some(json!("x"))] {
            let err = normalize_socialbuzz(payload.as_ref(), TS).unwrap_err();
            assert_eq!(err.to_string(), "No payload");
        }
    }

    #[test]
    fn non_string_fields_are_stringified() {
        let payload = json!({ "message": 12345, "name": "Rina", "amount": 5000 });
        let event = normalize_socialbuzz(Some(&payload), TS).unwrap();
        assert_eq!(event.message, "12345");
    }

    #[test]
    fn negative_and_garbage_amounts_clamp_to_zero() {
        assert_eq!(floor_amount(&json!(-500)), 0);
        assert_eq!(floor_amount(&json!("abc")), 0);
        assert_eq!(floor_amount(&json!(" 7500.99 ")), 7500);
        assert_eq!(floor_amount(&json!(true)), 0);
    }

    #[test]
    fn test_donation_defaults() {
        let event = test_donation(None, TS);
        assert_eq!(event.username, "TestUser");
        assert_eq!(event.display_name, "Test Donator");
        assert_eq!(event.amount, TEST_DEFAULT_AMOUNT);
        assert_eq!(event.message, "Test donation");
        assert_eq!(event.source, DonationSource::Test);
        assert!(event.email.is_none());
    }

    #[test]
    fn test_donation_parses_amount_leniently() {
        let body = json!({ "username": "Raka_7", "amount": "50000rb" });
        let event = test_donation(Some(&body), TS);
        assert_eq!(event.username, "Raka_7");
        assert_eq!(event.amount, 50000);

        assert_eq!(test_donation(Some(&json!({ "amount": 1234.9 })), TS).amount, 1234);
        assert_eq!(test_donation(Some(&json!({ "amount": "-3" })), TS).amount, TEST_DEFAULT_AMOUNT);
        assert_eq!(test_donation(Some(&json!({ "amount": "lots" })), TS).amount, TEST_DEFAULT_AMOUNT);
        assert_eq!(test_donation(Some(&json!({ "amount": 0 })), TS).amount, TEST_DEFAULT_AMOUNT);
    }

    #[test]
    fn event_serializes_with_camel_case_keys() {
        let payload = json!({ "type": "donation", "amount_raw": 1000, "donator_name": "Ayu" });
        let event = donation(normalize_saweria(Some(&payload), TS));
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["displayName"], "Ayu");
        assert_eq!(value["source"], "Saweria");
        assert_eq!(value["email"], "");
        let test_value = serde_json::to_value(test_donation(None, TS)).unwrap();
        assert!(test_value.get("email").is_none());
    }

    proptest! {
        #[test]
        fn floored_amount_never_exceeds_input(raw in 0.0f64..1.0e12) {
            let amount = floor_amount(&json!(raw));
            prop_assert!(amount as f64 <= raw);
            prop_assert!(raw - (amount as f64) < 1.0);
        }
    }
}
