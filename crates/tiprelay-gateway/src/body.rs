// SPDX-FileCopyrightText: 2026 Tiprelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lenient request bodies.
//!
//! Providers and browsers do not always send a JSON content type, and some
//! send no body at all. [`JsonBody`] never rejects: JSON is tried first, then
//! `application/x-www-form-urlencoded` when the request declares it. Form
//! fields arrive as strings. An empty, unreadable, or unparsable body (and a
//! literal `null`) becomes `None`.

use std::convert::Infallible;

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Request body parsed as JSON (or a form) when possible.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonBody(pub Option<Value>);

impl JsonBody {
    /// Deserialize into `T`, falling back to `T::default()` on any mismatch.
    pub fn parse<T: DeserializeOwned + Default>(&self) -> T {
        self.0
            .as_ref()
            .and_then(|value| T::deserialize(value).ok())
            .unwrap_or_default()
    }

    /// A string field of the body, when present and non-empty.
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.0
            .as_ref()
            .and_then(|value| value.get(name))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }
}

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(is_form);
        let Ok(bytes) = Bytes::from_request(req, state).await else {
            return Ok(Self(None));
        };
        Ok(Self(parse_lenient(&bytes, form)))
    }
}

fn is_form(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/x-www-form-urlencoded"))
}

fn parse_lenient(bytes: &[u8], form: bool) -> Option<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    match serde_json::from_slice::<Value>(bytes) {
        Ok(value) => Some(value).filter(|value| !value.is_null()),
        Err(_) if form => parse_form(bytes),
        Err(_) => None,
    }
}

/// Form fields as a JSON object of strings; a repeated key keeps the last value.
fn parse_form(bytes: &[u8]) -> Option<Value> {
    let pairs = serde_urlencoded::from_bytes::<Vec<(String, String)>>(bytes).ok()?;
    if pairs.is_empty() {
        return None;
    }
    let fields: Map<String, Value> = pairs
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect();
    Some(Value::Object(fields))
}
