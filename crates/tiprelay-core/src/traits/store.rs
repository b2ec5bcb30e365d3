// SPDX-FileCopyrightText: 2026 Tiprelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence trait for the mutable registry state.

use async_trait::async_trait;

use crate::error::RelayError;
use crate::types::PersistedState;

/// Load/save access to the persisted admin credential and game records.
///
/// There is no locking between `load` and `save`: concurrent
/// read-modify-write cycles resolve as last writer wins.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Returns the current state.
    ///
    /// Never fails: implementations log read errors and fall back to
    /// [`PersistedState::default`].
    async fn load(&self) -> PersistedState;

    /// Replaces the persisted state.
    async fn save(&self, state: &PersistedState) -> Result<(), RelayError>;
}
