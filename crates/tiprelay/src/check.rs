// SPDX-FileCopyrightText: 2026 Tiprelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tiprelay check` command implementation.
//!
//! Reports which game slots would become targets without touching the
//! network or the state file.

use colored::Colorize;

use tiprelay_config::model::{RelayConfig, slot_number};

/// Readiness of a single game slot.
#[derive(Debug, PartialEq, Eq)]
pub struct SlotReport {
    pub id: String,
    pub name: String,
    /// Required fields that are absent or empty. Empty means active.
    pub missing: Vec<&'static str>,
}

impl SlotReport {
    pub fn is_active(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Inspect every configured slot, ordered by slot number.
pub fn inspect(config: &RelayConfig) -> Vec<SlotReport> {
    let mut reports: Vec<SlotReport> = config
        .games
        .iter()
        .map(|(id, slot)| SlotReport {
            id: id.clone(),
            name: slot.name_or_default(id),
            missing: slot.missing_required(),
        })
        .collect();
    reports.sort_by_key(|r| (slot_number(&r.id), r.id.clone()));
    reports
}

/// Runs the `tiprelay check` command. Returns the process exit code.
pub fn run_check(config: &RelayConfig) -> i32 {
    let reports = inspect(config);

    println!("{}", "tiprelay configuration".bold());
    println!(
        "  state file: {} ({})",
        config.storage.state_path().display(),
        if config.storage.is_persistent() {
            "persistent".green()
        } else {
            "ephemeral".yellow()
        }
    );
    println!("  listen:     {}:{}", config.server.host, config.server.port);
    println!();

    if reports.is_empty() {
        println!("  {}", "no game slots found".red());
    }
    for report in &reports {
        if report.is_active() {
            println!("  {} {} ({})", "active ".green(), report.id, report.name);
        } else {
            println!(
                "  {} {} missing: {}",
                "dropped".red(),
                report.id,
                report.missing.join(", ")
            );
        }
    }

    let active = reports.iter().filter(|r| r.is_active()).count();
    println!();
    if active == 0 {
        println!(
            "{} set GAME_1_UNIVERSE_ID, GAME_1_API_KEY, GAME_1_WEBHOOK_SECRET and GAME_1_PASSWORD",
            "error:".red().bold()
        );
        1
    } else {
        println!("{} {active} game(s) ready", "ok:".green().bold());
        0
    }
}
