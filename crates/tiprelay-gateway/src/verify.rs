// SPDX-FileCopyrightText: 2026 Tiprelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound provider token verification.
//!
//! A target may configure a shared token per provider. When it does, the
//! request must present the same token in one of (checked in order):
//! 1. the `x-webhook-token` header
//! 2. the `authorization` header, with an optional `Bearer ` prefix
//! 3. a `token` string field in the JSON body
//!
//! Empty candidates are skipped. Comparison is plain string equality.

use axum::http::HeaderMap;
use serde_json::Value;

/// First non-empty token the request presents.
pub fn candidate_token<'a>(headers: &'a HeaderMap, body: Option<&'a Value>) -> Option<&'a str> {
    let header = move |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
    };

    header("x-webhook-token")
        .or_else(|| {
            header("authorization")
                .map(|v| v.strip_prefix("Bearer ").unwrap_or(v))
                .filter(|v| !v.is_empty())
        })
        .or_else(|| {
            body.and_then(|b| b.get("token"))
                .and_then(Value::as_str)
                .filter(|v| !v.is_empty())
        })
}

/// True when no token is expected, or the request presents the expected one.
pub fn verify_token(headers: &HeaderMap, body: Option<&Value>, expected: Option<&str>) -> bool {
    match expected.filter(|e| !e.is_empty()) {
        None => true,
        Some(expected) => candidate_token(headers, body) == Some(expected),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use serde_json::json;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn no_expected_token_always_passes() {
        assert!(verify_token(&HeaderMap::new(), None, None));
        assert!(verify_token(&headers(&[("x-webhook-token", "junk")]), None, Some("")));
    }

    #[test]
    fn dedicated_header_wins() {
        let h = headers(&[("x-webhook-token", "right"), ("authorization", "Bearer wrong")]);
        assert!(verify_token(&h, None, Some("right")));
        assert!(!verify_token(&h, None, Some("wrong")));
    }

    #[test]
    fn bearer_prefix_is_optional() {
        assert!(verify_token(&headers(&[("authorization", "Bearer s3cret")]), None, Some("s3cret")));
        assert!(verify_token(&headers(&[("authorization", "s3cret")]), None, Some("s3cret")));
    }

    #[test]
    fn body_token_is_last_resort() {
        let body = json!({ "token": "from-body" });
        assert!(verify_token(&HeaderMap::new(), Some(&body), Some("from-body")));

        let h = headers(&[("x-webhook-token", "")]);
        assert_eq!(candidate_token(&h, Some(&body)), Some("from-body"));

        let numeric = json!({ "token": 1234 });
        assert!(!verify_token(&HeaderMap::new(), Some(&numeric), Some("1234")));
    }

    #[test]
    fn missing_token_fails_when_expected() {
        assert!(!verify_token(&HeaderMap::new(), None, Some("expected")));
    }
}
