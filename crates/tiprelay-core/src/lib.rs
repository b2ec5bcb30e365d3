// SPDX-FileCopyrightText: 2026 Tiprelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the tiprelay donation relay.
//!
//! This crate provides the error type, the domain types shared by every
//! other crate, the adapter traits at the persistence and forwarding seams,
//! and the username extractor applied to donation messages.

pub mod error;
pub mod traits;
pub mod types;
pub mod username;

// Re-export key items at crate root for ergonomic imports.
pub use error::RelayError;
pub use traits::{Forwarder, StateStore};
pub use types::{
    AdminCredential, DonationEvent, DonationSource, DonationTarget, ForwardOutcome, GameRecord,
    PersistedState,
};
pub use username::extract_username;
