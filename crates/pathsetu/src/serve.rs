// SPDX-FileCopyrightText: 2026 Pathsetu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `pathsetu serve` command implementation.
//!
//! Opens the SQLite history store, builds the WhatsApp dispatcher and the
//! Gemini backend, wires them into a turn processor, and serves the webhook
//! gateway until SIGINT or SIGTERM.

use std::sync::Arc;

use pathsetu_agent::{build_turn_processor, shutdown};
use pathsetu_config::PathsetuConfig;
use pathsetu_core::{GenerationBackend, PathsetuError, PluginAdapter};
use pathsetu_gateway::{GatewayState, ServerConfig, start_server};
use pathsetu_gemini::GeminiBackend;
use pathsetu_storage::SqliteHistoryStore;
use pathsetu_whatsapp::WhatsAppDispatcher;
use tracing::{error, info, warn};

/// Runs the `pathsetu serve` command.
///
/// A missing Gemini key is not fatal: the server starts and answers every
/// message with a configuration notice. Missing WhatsApp credentials are.
pub async fn run_serve(config: PathsetuConfig) -> Result<(), PathsetuError> {
    info!(name = %config.agent.name, "starting pathsetu");

    let storage = Arc::new(SqliteHistoryStore::new(config.storage.clone()));
    storage.initialize().await?;

    let dispatcher = Arc::new(WhatsAppDispatcher::new(&config.whatsapp)?);

    let gemini = match GeminiBackend::new(&config.gemini) {
        Ok(backend) => Some(Arc::new(backend)),
        Err(e) => {
            error!(error = %e, "generation backend unavailable, replies will carry a setup notice");
            None
        }
    };
    let backend = gemini
        .clone()
        .map(|b| b as Arc<dyn GenerationBackend>);

    let processor =
        build_turn_processor(&config, storage.clone(), dispatcher.clone(), backend).await;

    let mut state = GatewayState::new(Arc::new(processor))
        .with_adapter(storage.clone())
        .with_adapter(dispatcher)
        .with_app_secret(config.whatsapp.app_secret.clone());
    if let Some(gemini) = gemini {
        state = state.with_adapter(gemini);
    }
    if state.app_secret.is_none() {
        warn!("whatsapp.app_secret is not set, webhook signatures will not be checked");
    }

    let cancel = shutdown::install_signal_handler();
    let server_config = ServerConfig {
        host: config.server.bind_address.clone(),
        port: config.server.port,
    };
    let result = start_server(&server_config, state, cancel).await;

    if let Err(e) = storage.shutdown().await {
        warn!(error = %e, "history store shutdown failed");
    }
    info!("pathsetu stopped");
    result
}

/// Initializes the tracing subscriber with the given log level.
///
/// `RUST_LOG` takes precedence when set.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pathsetu={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
