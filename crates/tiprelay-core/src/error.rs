// SPDX-FileCopyrightText: 2026 Tiprelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the tiprelay donation relay.

use thiserror::Error;

/// The primary error type used across all tiprelay crates.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Configuration errors (invalid values, unusable paths, bad client settings).
    #[error("configuration error: {0}")]
    Config(String),

    /// Persistence errors (state file I/O, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Bad password, token, or admin credential.
    ///
    /// Deliberately carries no detail so callers cannot tell an unknown
    /// account apart from a wrong password.
    #[error("unauthorized")]
    Unauthorized,

    /// Rejected input (missing payload, short password, unknown record).
    #[error("{0}")]
    Validation(String),

    /// The outbound messaging call failed or returned a non-2xx status.
    #[error("upstream error: {message}")]
    Upstream {
        /// HTTP status returned by the upstream, if a response arrived.
        status: Option<u16>,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// No donation target has a complete configuration.
    #[error("no games configured")]
    NotConfigured,

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RelayError {
    /// Wraps any error as a storage error.
    pub fn storage(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Storage {
            source: source.into(),
        }
    }
}
