// SPDX-FileCopyrightText: 2026 Tiprelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound relay trait for donation events.

use async_trait::async_trait;

use crate::error::RelayError;
use crate::types::{DonationEvent, DonationTarget, ForwardOutcome};

/// Delivers a normalized donation event to a target's messaging topic.
///
/// Implementations make exactly one attempt; there is no retry or queueing.
#[async_trait]
pub trait Forwarder: Send + Sync {
    /// Sends `event` to `target`, returning the upstream status and body on 2xx.
    async fn forward(
        &self,
        target: &DonationTarget,
        event: &DonationEvent,
    ) -> Result<ForwardOutcome, RelayError>;
}
