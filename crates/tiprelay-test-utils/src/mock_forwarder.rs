// SPDX-FileCopyrightText: 2026 Tiprelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Forwarder that records events instead of calling the messaging API.

use std::sync::Mutex;

use async_trait::async_trait;

use tiprelay_core::{DonationEvent, DonationTarget, ForwardOutcome, Forwarder, RelayError};

/// A [`Forwarder`] that captures every `(target id, event)` pair.
///
/// With a failure status set, calls are still recorded but return
/// [`RelayError::Upstream`] carrying that status.
#[derive(Default)]
pub struct MockForwarder {
    calls: Mutex<Vec<(String, DonationEvent)>>,
    failure: Mutex<Option<u16>>,
}

impl MockForwarder {
    /// Create a forwarder that always succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a forwarder that always fails with the given upstream status.
    pub fn failing(status: u16) -> Self {
        let forwarder = Self::default();
        forwarder.set_failure(Some(status));
        forwarder
    }

    /// Change the failure mode; `None` means succeed.
    pub fn set_failure(&self, status: Option<u16>) {
        *self.failure.lock().expect("forwarder lock poisoned") = status;
    }

    /// Every call made so far, oldest first.
    pub fn calls(&self) -> Vec<(String, DonationEvent)> {
        self.calls.lock().expect("forwarder lock poisoned").clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("forwarder lock poisoned").len()
    }

    /// The most recent event, if any.
    pub fn last_event(&self) -> Option<DonationEvent> {
        self.calls
            .lock()
            .expect("forwarder lock poisoned")
            .last()
            .map(|(_, event)| event.clone())
    }
}

#[async_trait]
impl Forwarder for MockForwarder {
    async fn forward(
        &self,
        target: &DonationTarget,
        event: &DonationEvent,
    ) -> Result<ForwardOutcome, RelayError> {
        self.calls
            .lock()
            .expect("forwarder lock poisoned")
            .push((target.id.clone(), event.clone()));

        match *self.failure.lock().expect("forwarder lock poisoned") {
            Some(status) => Err(RelayError::Upstream {
                status: Some(status),
                message: "mock upstream failure".to_string(),
                source: None,
            }),
            None => Ok(ForwardOutcome {
                status: 200,
                body: serde_json::json!({}),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_target;
    use tiprelay_core::DonationSource;

    fn event() -> DonationEvent {
        DonationEvent {
            username: "Budi".into(),
            display_name: "Budi".into(),
            amount: 10_000,
            timestamp: 1_700_000_000,
            source: DonationSource::Saweria,
            message: "hi".into(),
            email: None,
        }
    }

    #[tokio::test]
    async fn records_successful_calls() {
        let forwarder = MockForwarder::new();
        let outcome = forwarder.forward(&sample_target(1), &event()).await.unwrap();
        assert_eq!(outcome.status, 200);
        assert_eq!(forwarder.calls(), vec![("game1".to_string(), event())]);
    }

    #[tokio::test]
    async fn failing_mode_still_records() {
        let forwarder = MockForwarder::failing(503);
        let err = forwarder.forward(&sample_target(1), &event()).await.unwrap_err();
        assert!(matches!(err, RelayError::Upstream { status: Some(503), .. }));
        assert_eq!(forwarder.call_count(), 1);
    }
}
