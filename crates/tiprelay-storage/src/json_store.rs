// SPDX-FileCopyrightText: 2026 Tiprelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON file implementation of the [`StateStore`] trait.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use tiprelay_config::model::{AdminConfig, StorageConfig};
use tiprelay_core::{AdminCredential, PersistedState, RelayError, StateStore};

/// State file store with a write-through in-memory cache.
///
/// The first successful read populates the cache; every later `load` is
/// served from memory until the next `save` replaces it. Read failures are
/// logged and answered with [`PersistedState::default`], which is never
/// cached, so a repaired file is picked up on the next call.
///
/// File writes and cache fills happen under the cache write lock; a state
/// read from disk never replaces one that a concurrent `save` cached first.
pub struct JsonFileStore {
    path: PathBuf,
    seed_admin: AdminCredential,
    cache: RwLock<Option<PersistedState>>,
}

impl JsonFileStore {
    /// Create a store for the file at `path`.
    ///
    /// `seed_admin` is written into a fresh file when none exists.
    pub fn new(path: impl Into<PathBuf>, seed_admin: AdminCredential) -> Self {
        Self {
            path: path.into(),
            seed_admin,
            cache: RwLock::new(None),
        }
    }

    /// Create a store from configuration, creating the volume directory if needed.
    pub async fn open(storage: &StorageConfig, admin: &AdminConfig) -> Result<Self, RelayError> {
        if let Some(volume) = storage.volume_path.as_deref().filter(|_| storage.is_persistent()) {
            let volume = Path::new(volume);
            if !tokio::fs::try_exists(volume).await.unwrap_or(false) {
                tokio::fs::create_dir_all(volume)
                    .await
                    .map_err(RelayError::storage)?;
                info!(path = %volume.display(), "created volume directory");
            }
        }

        Ok(Self::new(
            storage.state_path(),
            AdminCredential {
                username: admin.username.clone(),
                password: admin.password.clone(),
            },
        ))
    }

    /// Location of the state file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Drop the cached state so the next `load` re-reads the file.
    pub async fn invalidate(&self) {
        *self.cache.write().await = None;
    }

    async fn write_file(&self, state: &PersistedState) -> Result<(), RelayError> {
        let content = serde_json::to_string_pretty(state).map_err(RelayError::storage)?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, content)
            .await
            .map_err(RelayError::storage)?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(RelayError::storage)?;
        Ok(())
    }

    /// Cache a state read from disk unless a save got there first.
    async fn remember(&self, state: PersistedState) -> PersistedState {
        let mut cache = self.cache.write().await;
        match cache.as_ref() {
            Some(current) => current.clone(),
            None => {
                *cache = Some(state.clone());
                state
            }
        }
    }

    async fn seed(&self) -> PersistedState {
        let mut cache = self.cache.write().await;
        if let Some(current) = cache.as_ref() {
            return current.clone();
        }

        let state = PersistedState::seeded(self.seed_admin.clone());
        match self.write_file(&state).await {
            Ok(()) => {
                info!(path = %self.path.display(), "created new state file");
                *cache = Some(state.clone());
            }
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "failed to create state file");
            }
        }
        state
    }
}

#[async_trait]
impl StateStore for JsonFileStore {
    async fn load(&self) -> PersistedState {
        if let Some(state) = self.cache.read().await.as_ref() {
            return state.clone();
        }

        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => match serde_json::from_str::<PersistedState>(&content) {
                Ok(state) => {
                    debug!(games = state.games.len(), "state file loaded");
                    self.remember(state).await
                }
                Err(e) => {
                    error!(path = %self.path.display(), error = %e, "state file is not valid JSON, using defaults");
                    PersistedState::default()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => self.seed().await,
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "failed to read state file, using defaults");
                PersistedState::default()
            }
        }
    }

    async fn save(&self, state: &PersistedState) -> Result<(), RelayError> {
        let mut cache = self.cache.write().await;
        if let Err(e) = self.write_file(state).await {
            error!(path = %self.path.display(), error = %e, "failed to write state file");
            return Err(e);
        }
        *cache = Some(state.clone());
        Ok(())
    }
}
