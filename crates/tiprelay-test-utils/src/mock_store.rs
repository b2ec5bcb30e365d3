// SPDX-FileCopyrightText: 2026 Tiprelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory state store for deterministic testing.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use tiprelay_core::{PersistedState, RelayError, StateStore};

/// A [`StateStore`] backed by a mutex-guarded [`PersistedState`].
///
/// Writes can be made to fail to exercise error paths.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<PersistedState>,
    fail_writes: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryStore {
    /// Create a store holding the default state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-loaded with `state`.
    pub fn with_state(state: PersistedState) -> Self {
        Self {
            state: Mutex::new(state),
            ..Self::default()
        }
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> PersistedState {
        self.state.lock().expect("store lock poisoned").clone()
    }

    /// Overwrite the state without going through `save`.
    pub fn replace(&self, state: PersistedState) {
        *self.state.lock().expect("store lock poisoned") = state;
    }

    /// Make every subsequent `save` fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn load(&self) -> PersistedState {
        self.snapshot()
    }

    async fn save(&self, state: &PersistedState) -> Result<(), RelayError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RelayError::storage(std::io::Error::other(
                "simulated write failure",
            )));
        }
        self.replace(state.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiprelay_core::AdminCredential;

    #[tokio::test]
    async fn save_then_load() {
        let store = MemoryStore::new();
        let mut state = store.load().await;
        state.admin = AdminCredential {
            username: "root".into(),
            password: "toor".into(),
        };
        store.save(&state).await.unwrap();
        assert_eq!(store.load().await, state);
        assert_eq!(store.save_count(), 1);
    }

    #[tokio::test]
    async fn failing_writes_leave_state_untouched() {
        let store = MemoryStore::new();
        store.fail_writes(true);
        let mut state = store.load().await;
        state.admin.username = "changed".into();
        assert!(store.save(&state).await.is_err());
        assert_eq!(store.snapshot(), PersistedState::default());
        assert_eq!(store.save_count(), 0);
    }
}
