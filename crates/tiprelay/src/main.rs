// SPDX-FileCopyrightText: 2026 Tiprelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! tiprelay - donation webhooks delivered into live game servers.
//!
//! This is the binary entry point for the relay.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod check;
mod serve;
mod shutdown;

use clap::{Parser, Subcommand};

/// tiprelay - donation webhooks delivered into live game servers.
#[derive(Parser, Debug)]
#[command(name = "tiprelay", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the relay server (default).
    Serve,
    /// Validate configuration and list which game slots are active.
    Check,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match tiprelay_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            tiprelay_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let code = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => match serve::run_serve(config).await {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("error: {e}");
                1
            }
        },
        Commands::Check => check::run_check(&config),
    };

    if code != 0 {
        std::process::exit(code);
    }
}
