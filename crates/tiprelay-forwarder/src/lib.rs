// SPDX-FileCopyrightText: 2026 Tiprelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Donation forwarding for tiprelay.
//!
//! Turns provider webhook payloads into [`DonationEvent`]s and publishes them
//! to the game platform's messaging API through [`MessagingClient`].
//!
//! [`DonationEvent`]: tiprelay_core::DonationEvent

pub mod client;
pub mod format;
pub mod normalize;

pub use client::MessagingClient;
pub use format::format_rupiah;
pub use normalize::{Normalized, normalize_saweria, normalize_socialbuzz, test_donation};
