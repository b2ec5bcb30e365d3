// SPDX-FileCopyrightText: 2026 Tiprelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The authoritative set of donation targets.
//!
//! Targets are derived by merging the environment-declared slots with the
//! persisted per-game records. Handlers read an immutable [`TargetSet`]
//! snapshot; [`Registry::rebuild`] replaces it wholesale.

use std::collections::BTreeMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use secrecy::SecretString;
use tracing::{debug, info, warn};

use tiprelay_config::model::{GameSlotConfig, slot_number};
use tiprelay_core::{DonationTarget, GameRecord, RelayError, StateStore};

/// Immutable snapshot of the active donation targets, in slot order.
#[derive(Debug, Default)]
pub struct TargetSet {
    targets: Vec<DonationTarget>,
}

impl TargetSet {
    pub fn new(targets: Vec<DonationTarget>) -> Self {
        Self { targets }
    }

    pub fn iter(&self) -> impl Iterator<Item = &DonationTarget> {
        self.targets.iter()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&DonationTarget> {
        self.targets.iter().find(|t| t.id == id)
    }

    /// Target whose webhook path segment equals `path`.
    pub fn by_webhook_path(&self, path: &str) -> Option<&DonationTarget> {
        self.targets.iter().find(|t| t.webhook_path == path)
    }

    /// First target whose access password equals `password` exactly.
    ///
    /// An empty password never matches.
    pub fn authenticate(&self, password: &str) -> Option<&DonationTarget> {
        if password.is_empty() {
            return None;
        }
        self.targets
            .iter()
            .find(|t| !t.access_password.is_empty() && t.access_password == password)
    }
}

/// Merges configured slots with persisted state and publishes snapshots.
pub struct Registry {
    slots: Vec<(String, GameSlotConfig)>,
    store: Arc<dyn StateStore>,
    snapshot: ArcSwap<TargetSet>,
}

impl Registry {
    /// Create a registry over the configured slots.
    ///
    /// The snapshot starts empty; call [`rebuild`](Self::rebuild) before serving.
    pub fn new(games: &BTreeMap<String, GameSlotConfig>, store: Arc<dyn StateStore>) -> Self {
        let mut slots: Vec<(String, GameSlotConfig)> = games
            .iter()
            .map(|(id, slot)| (id.clone(), slot.clone()))
            .collect();
        // `game10` sorts after `game9`, not after `game1`.
        slots.sort_by(|(a, _), (b, _)| {
            slot_number(a)
                .unwrap_or(u32::MAX)
                .cmp(&slot_number(b).unwrap_or(u32::MAX))
                .then_with(|| a.cmp(b))
        });

        Self {
            slots,
            store,
            snapshot: ArcSwap::from_pointee(TargetSet::default()),
        }
    }

    /// Current snapshot of active targets.
    pub fn snapshot(&self) -> Arc<TargetSet> {
        self.snapshot.load_full()
    }

    pub fn store(&self) -> &Arc<dyn StateStore> {
        &self.store
    }

    /// Slots that cannot become targets, with the fields they lack.
    pub fn incomplete_slots(&self) -> Vec<(&str, Vec<&'static str>)> {
        self.slots
            .iter()
            .filter_map(|(id, slot)| {
                let missing = slot.missing_required();
                (!missing.is_empty()).then_some((id.as_str(), missing))
            })
            .collect()
    }

    /// Re-derive the target set from configuration and the persisted state.
    ///
    /// The merged game list is written back even when nothing changed, which
    /// self-heals records missing from the state file. Returns
    /// [`RelayError::NotConfigured`] when no slot is complete; the previous
    /// snapshot is kept in that case.
    pub async fn rebuild(&self) -> Result<Arc<TargetSet>, RelayError> {
        self.rebuild_at(Utc::now()).await
    }

    /// [`rebuild`](Self::rebuild) with an explicit clock for new records.
    pub async fn rebuild_at(&self, now: DateTime<Utc>) -> Result<Arc<TargetSet>, RelayError> {
        let mut state = self.store.load().await;

        let mut targets = Vec::new();
        let mut records = Vec::new();

        for (id, slot) in &self.slots {
            let missing = slot.missing_required();
            if !missing.is_empty() {
                warn!(game = %id, missing = ?missing, "game slot incomplete, skipping");
                continue;
            }

            let persisted = state.game(id);
            let password = persisted
                .and_then(|g| g.password.clone())
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| field(&slot.password));
            let last_active = persisted.and_then(|g| g.last_active).unwrap_or(now);
            let created_at = persisted.and_then(|g| g.created_at).unwrap_or(now);

            records.push(GameRecord {
                id: id.clone(),
                password: Some(password.clone()),
                last_active: Some(last_active),
                created_at: Some(created_at),
            });

            targets.push(DonationTarget {
                id: id.clone(),
                display_name: slot.name_or_default(id),
                universe_id: field(&slot.universe_id),
                topic: slot.topic_or_default(),
                api_key: SecretString::from(field(&slot.api_key)),
                webhook_path: field(&slot.webhook_secret),
                saweria_token: slot.saweria_token.clone().filter(|t| !t.is_empty()),
                socialbuzz_token: slot.socialbuzz_token.clone().filter(|t| !t.is_empty()),
                access_password: password,
                last_active_at: last_active,
                created_at,
            });
        }

        state.games = records;
        if let Err(e) = self.store.save(&state).await {
            warn!(error = %e, "failed to persist merged game list");
        }

        if targets.is_empty() {
            return Err(RelayError::NotConfigured);
        }

        let set = Arc::new(TargetSet::new(targets));
        self.snapshot.store(Arc::clone(&set));
        debug!(games = set.len(), "registry rebuilt");
        Ok(set)
    }

    /// Stamp `lastActive` on the persisted record for `id`.
    ///
    /// Unknown ids are ignored. The snapshot is not rebuilt.
    pub async fn record_activity(&self, id: &str) -> Result<(), RelayError> {
        let mut state = self.store.load().await;
        let Some(record) = state.game_mut(id) else {
            debug!(game = %id, "no persisted record to stamp");
            return Ok(());
        };
        record.last_active = Some(Utc::now());
        self.store.save(&state).await
    }

    /// Persist a new access password for `id` and rebuild the snapshot.
    pub async fn set_password(&self, id: &str, new_password: &str) -> Result<(), RelayError> {
        let mut state = self.store.load().await;
        let Some(record) = state.game_mut(id) else {
            return Err(RelayError::Validation("Game not found".to_string()));
        };
        record.password = Some(new_password.to_string());
        self.store.save(&state).await?;
        self.rebuild().await?;
        info!(game = %id, "access password changed");
        Ok(())
    }
}

fn field(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}
