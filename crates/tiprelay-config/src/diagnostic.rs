// SPDX-FileCopyrightText: 2026 Tiprelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Config errors rendered as miette diagnostics.
//!
//! Unknown keys point at their line in `tiprelay.toml` and carry a
//! Jaro-Winkler "did you mean" suggestion. Every diagnostic also names the
//! deployment variable that sets the key, since most deployments never ship
//! a config file.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Minimum Jaro-Winkler similarity score to suggest a correction.
const SUGGESTION_THRESHOLD: f64 = 0.75;

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(code(tiprelay::config::unknown_key), help("{help}"))]
    UnknownKey {
        key: String,
        suggestion: Option<String>,
        help: String,
        #[label("not a tiprelay setting")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("`{key}` has the wrong type: {detail}")]
    #[diagnostic(code(tiprelay::config::invalid_type), help("{help}"))]
    InvalidType {
        key: String,
        detail: String,
        help: String,
    },

    #[error("missing required key `{key}`")]
    #[diagnostic(code(tiprelay::config::missing_key), help("{help}"))]
    MissingKey { key: String, help: String },

    #[error("validation error: {message}")]
    #[diagnostic(code(tiprelay::config::validation))]
    Validation { message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(tiprelay::config::other))]
    Other(String),
}

/// Convert a `figment::Error` (which may hold several errors) into diagnostics.
///
/// `toml_sources` are `(name, content)` pairs used to attach source spans.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    use figment::error::Kind;

    err.into_iter()
        .map(|error| {
            let path: Vec<String> = error.path.clone();
            match &error.kind {
                Kind::UnknownField(field, expected) => {
                    let suggestion = suggest_key(field, expected);
                    let mut help = match &suggestion {
                        Some(s) => format!("did you mean `{s}`? "),
                        None => String::new(),
                    };
                    help.push_str(&format!("valid keys here: {}", expected.join(", ")));
                    let (span, src) = locate(&error, &path, field, toml_sources);
                    ConfigError::UnknownKey {
                        key: dotted(&path, field),
                        suggestion,
                        help,
                        span,
                        src,
                    }
                }
                Kind::MissingField(field) => ConfigError::MissingKey {
                    key: dotted(&path, field),
                    help: format!(
                        "add it to tiprelay.toml or set {}",
                        env_var_for(&path, field)
                    ),
                },
                Kind::InvalidType(actual, expected) => {
                    let (parent, field) = match path.split_last() {
                        Some((field, parent)) => (parent, field.as_str()),
                        None => (&path[..0], ""),
                    };
                    ConfigError::InvalidType {
                        key: path.join("."),
                        detail: format!("found {actual}, expected {expected}"),
                        help: format!(
                            "check the value in tiprelay.toml or {}",
                            env_var_for(parent, field)
                        ),
                    }
                }
                _ => ConfigError::Other(error.to_string()),
            }
        })
        .collect()
}

/// Deployment variable that sets `path.field`.
///
/// `["games", "game2"]` + `api_key` is `GAME_2_API_KEY`; the handful of
/// unprefixed platform variables map directly; everything else falls back
/// to the `TIPRELAY_<SECTION>_<FIELD>` form.
pub fn env_var_for(path: &[String], field: &str) -> String {
    let section: Vec<&str> = path.iter().map(String::as_str).collect();
    match (section.as_slice(), field) {
        (["server"], "port") => "PORT".to_string(),
        (["storage"], "volume_path") => "VOLUME_PATH".to_string(),
        (["admin"], f) => format!("ADMIN_{}", f.to_ascii_uppercase()),
        (["games", slot], f) if crate::model::slot_number(slot).is_some() => format!(
            "GAME_{}_{}",
            slot.trim_start_matches("game"),
            f.to_ascii_uppercase()
        ),
        (sections, f) => {
            let mut name = String::from("TIPRELAY");
            for part in sections.iter().copied().chain(std::iter::once(f)) {
                name.push('_');
                name.push_str(&part.to_ascii_uppercase());
            }
            name
        }
    }
}

fn dotted(path: &[String], field: &str) -> String {
    path.iter()
        .map(String::as_str)
        .chain(std::iter::once(field))
        .collect::<Vec<_>>()
        .join(".")
}

fn locate(
    error: &figment::error::Error,
    path: &[String],
    field: &str,
    toml_sources: &[(String, String)],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let file = error
        .metadata
        .as_ref()
        .and_then(|m| m.source.as_ref())
        .and_then(|s| match s {
            figment::Source::File(p) => Some(p.display().to_string()),
            _ => None,
        });

    // Inline TOML has no file source; use it when it is the only candidate.
    let source = match file {
        Some(file) => toml_sources.iter().find(|(name, _)| *name == file),
        None if toml_sources.len() == 1 => toml_sources.first(),
        None => None,
    };

    source
        .and_then(|(name, content)| {
            let offset = find_key_offset(content, path, field)?;
            Some((
                Some(SourceSpan::new(offset.into(), field.len())),
                Some(NamedSource::new(name, content.clone())),
            ))
        })
        .unwrap_or((None, None))
}

/// Byte offset of `field` inside the TOML table named by `path`.
///
/// Tracks `[table]` headers line by line, so a key is only matched inside
/// its own table. An empty `path` means the root table (before any header).
pub fn find_key_offset(content: &str, path: &[String], field: &str) -> Option<usize> {
    let wanted = path.join(".");
    let mut table = String::new();
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        let trimmed = line.trim_start();
        let indent = line.len() - trimmed.len();

        if let Some(header) = trimmed
            .strip_prefix('[')
            .and_then(|rest| rest.split_once(']'))
            .map(|(name, _)| name.trim())
        {
            table = header.to_string();
        } else if table == wanted {
            let key = trimmed
                .split(['=', ' ', '\t'])
                .next()
                .unwrap_or_default()
                .trim_matches('"');
            let assigns = trimmed
                .strip_prefix(field)
                .is_some_and(|rest| rest.trim_start().starts_with('='));
            if key == field && assigns {
                return Some(offset + indent);
            }
        }

        offset += line.len();
    }

    None
}

/// Closest valid key by Jaro-Winkler similarity, if any clears the threshold.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Print every error to stderr with miette's graphical report handler.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for error in errors {
        let mut out = String::new();
        match handler.render_report(&mut out, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{out}"),
            Err(_) => eprintln!("error: {error}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn suggest_webhook_secret_for_typo() {
        let valid = &["name", "universe_id", "webhook_secret", "password"];
        assert_eq!(
            suggest_key("webhook_secrt", valid),
            Some("webhook_secret".to_string())
        );
    }

    #[test]
    fn no_suggestion_for_distant_typo() {
        assert_eq!(suggest_key("zzzzzz", &["host", "port"]), None);
    }

    #[test]
    fn key_offset_respects_tables() {
        let content = "api_kye = 1\n[server]\nport = 1\n\n[games.game1]\napi_kye = \"x\"\n";
        let o = find_key_offset(content, &path(&["games", "game1"]), "api_kye").unwrap();
        assert_eq!(&content[o..o + 7], "api_kye");
        assert!(o > 12);
    }

    #[test]
    fn key_offset_root_table() {
        let content = "log_levl = \"debug\"\n[server]\nlog_levl = 1\n";
        assert_eq!(find_key_offset(content, &[], "log_levl"), Some(0));
    }

    #[test]
    fn key_offset_ignores_prefix_matches() {
        let content = "[server]\nportal = 1\n";
        assert_eq!(find_key_offset(content, &path(&["server"]), "port"), None);
    }

    #[test]
    fn env_var_names() {
        assert_eq!(env_var_for(&path(&["games", "game2"]), "api_key"), "GAME_2_API_KEY");
        assert_eq!(env_var_for(&path(&["server"]), "port"), "PORT");
        assert_eq!(env_var_for(&path(&["admin"]), "password"), "ADMIN_PASSWORD");
        assert_eq!(
            env_var_for(&path(&["forwarder"]), "timeout_secs"),
            "TIPRELAY_FORWARDER_TIMEOUT_SECS"
        );
    }

    #[test]
    fn dotted_key() {
        assert_eq!(dotted(&path(&["games", "game1"]), "api_kye"), "games.game1.api_kye");
        assert_eq!(dotted(&[], "log_level"), "log_level");
    }
}
