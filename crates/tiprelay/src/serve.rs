// SPDX-FileCopyrightText: 2026 Tiprelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tiprelay serve` command implementation.
//!
//! Opens the state file, builds the target registry from the game slots,
//! and serves the webhook and dashboard routes until SIGINT or SIGTERM.

use std::sync::Arc;

use tracing::{error, info, warn};

use tiprelay_config::model::RelayConfig;
use tiprelay_core::{RelayError, StateStore};
use tiprelay_forwarder::MessagingClient;
use tiprelay_gateway::{GatewayState, start_server};
use tiprelay_registry::{AdminAuth, Registry};
use tiprelay_storage::JsonFileStore;

use crate::shutdown;

/// Deployment variables a game slot needs before it becomes a target.
const REQUIRED_VARS: [&str; 4] = ["UNIVERSE_ID", "API_KEY", "WEBHOOK_SECRET", "PASSWORD"];

/// Runs the `tiprelay serve` command.
pub async fn run_serve(config: RelayConfig) -> Result<(), RelayError> {
    init_tracing(&config.log_level);

    info!("starting tiprelay serve");

    let store = Arc::new(JsonFileStore::open(&config.storage, &config.admin).await?);
    info!(path = %store.path().display(), "state file");
    if config.storage.is_persistent() {
        info!("persistent storage enabled");
    } else {
        warn!("no volume configured, state will not survive a redeploy (set VOLUME_PATH)");
    }

    let store_dyn: Arc<dyn StateStore> = store.clone();
    let registry = Arc::new(Registry::new(&config.games, store_dyn.clone()));

    let targets = match registry.rebuild().await {
        Ok(targets) => targets,
        Err(RelayError::NotConfigured) => {
            error!("no games configured");
            for var in REQUIRED_VARS {
                error!("required: GAME_1_{var}");
            }
            return Err(RelayError::NotConfigured);
        }
        Err(e) => return Err(e),
    };

    info!(count = targets.len(), "games loaded");
    for target in targets.iter() {
        info!(
            game = %target.id,
            name = %target.display_name,
            universe = %target.universe_id,
            "game ready"
        );
    }

    let admin = AdminAuth::new(store_dyn);
    info!(username = %admin.username().await, "admin account");

    let forwarder = Arc::new(MessagingClient::new(&config.forwarder)?);
    let state = GatewayState {
        registry,
        admin,
        forwarder,
    };

    let cancel = shutdown::install_signal_handler();
    start_server(&config.server, state, cancel).await?;

    info!("tiprelay stopped");
    Ok(())
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when set.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tiprelay={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
