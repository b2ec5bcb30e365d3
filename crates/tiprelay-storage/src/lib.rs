// SPDX-FileCopyrightText: 2026 Tiprelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence layer for the tiprelay donation relay.
//!
//! The mutable registry state (admin credential, per-game passwords and
//! activity timestamps) lives in a single pretty-printed JSON file.

pub mod json_store;

pub use json_store::JsonFileStore;
