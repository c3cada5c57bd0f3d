// SPDX-FileCopyrightText: 2026 Pathsetu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pathsetu - WhatsApp career guidance backed by Gemini.
//!
//! This is the binary entry point.

mod print_config;
mod serve;

use std::path::PathBuf;

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};

/// Pathsetu - WhatsApp career guidance backed by Gemini.
#[derive(Parser, Debug)]
#[command(name = "pathsetu", version, about, long_about = None)]
struct Cli {
    /// Config file to load instead of the default search locations.
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the webhook server (default).
    Serve,
    /// Send one text message to check WhatsApp credentials.
    SendTest {
        /// Recipient phone number in international format, digits only.
        #[arg(long)]
        to: String,
        /// Message body.
        #[arg(long, default_value = send_test::DEFAULT_MESSAGE)]
        message: String,
    },
    /// Validate configuration and print the effective values.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => pathsetu_config::load_and_validate_path(path),
        None => pathsetu_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            pathsetu_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            serve::init_tracing(&config.agent.log_level);
            serve::run_serve(config).await
        }
        Commands::SendTest { to, message } => {
            serve::init_tracing(&config.agent.log_level);
            send_test::run_send_test(&config, &to, &message).await
        }
        Commands::Config => print_config::run_config(&config),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
