// SPDX-FileCopyrightText: 2026 Tiprelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Game registry and dashboard authentication.
//!
//! [`Registry`] owns the active donation targets as an atomically swapped
//! snapshot. [`AdminAuth`] checks admin logins and bearer tokens against the
//! persisted credential.

pub mod auth;
pub mod registry;

pub use auth::{AdminAuth, decode_token, encode_token};
pub use registry::{Registry, TargetSet};
