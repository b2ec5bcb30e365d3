// SPDX-FileCopyrightText: 2026 Tiprelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Best-effort extraction of an in-game handle from a donation message.
//!
//! Donors are asked to prefix their message with their username. The
//! accepted forms, checked in order on the trimmed message:
//!
//! 1. `[username] message`
//! 2. `@username message`
//! 3. `username: message`
//! 4. `username message`, only when the first word looks like a handle
//!    (3-20 chars of `[A-Za-z0-9_]` containing a digit or underscore)
//!
//! Anything else yields the donor's display name.

use std::sync::LazyLock;

use regex::Regex;

static BRACKET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\[([^\]]+)\]").unwrap());
static AT_MENTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^@(\S+)").unwrap());
static COLON_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([^\s:]+):").unwrap());
static HANDLE_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_]+$").unwrap());
static HANDLE_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9_]").unwrap());

const MIN_HANDLE_LEN: usize = 3;
const MAX_HANDLE_LEN: usize = 20;

/// Returns the username encoded in `message`, or `fallback` if none is found.
///
/// Total and deterministic for every input.
pub fn extract_username(message: &str, fallback: &str) -> String {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        return fallback.to_string();
    }

    for pattern in [&*BRACKET, &*AT_MENTION, &*COLON_PREFIX] {
        if let Some(captured) = pattern.captures(trimmed).and_then(|c| c.get(1)) {
            let candidate = captured.as_str().trim();
            if !candidate.is_empty() {
                return candidate.to_string();
            }
        }
    }

    if let Some(first) = trimmed.split_whitespace().next()
        && looks_like_handle(first)
    {
        return first.to_string();
    }

    fallback.to_string()
}

fn looks_like_handle(word: &str) -> bool {
    (MIN_HANDLE_LEN..=MAX_HANDLE_LEN).contains(&word.len())
        && HANDLE_CHARS.is_match(word)
        && HANDLE_MARKER.is_match(word)
}
