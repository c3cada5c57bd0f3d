// SPDX-FileCopyrightText: 2026 Pathsetu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turn-processing pipeline.
//!
//! - [`context`]: history reformatting and system prompt loading
//! - [`fallback`]: ordered model fallback
//! - [`diagram`]: Mermaid block extraction and image URL resolution
//! - [`turn`]: the per-event orchestrator
//! - [`shutdown`]: signal handling for the server

pub mod context;
pub mod diagram;
pub mod fallback;
pub mod shutdown;
pub mod turn;

use std::sync::Arc;

use pathsetu_config::PathsetuConfig;
use pathsetu_core::{GenerationBackend, HistoryStore, MessageDispatcher};
use tracing::{debug, info};

pub use context::{DEFAULT_SYSTEM_PROMPT, HistoryAdapter, load_system_prompt};
pub use diagram::{DiagramRenderer, Extraction, extract};
pub use fallback::GenerationFallbackEngine;
pub use turn::{ReplyTexts, TurnOutcome, TurnProcessor, TurnStep};

/// Wires a [`TurnProcessor`] from configuration and collaborators.
///
/// `backend` is `None` when the generation client could not be built.
pub async fn build_turn_processor(
    config: &PathsetuConfig,
    history: Arc<dyn HistoryStore>,
    dispatcher: Arc<dyn MessageDispatcher>,
    backend: Option<Arc<dyn GenerationBackend>>,
) -> TurnProcessor {
    let adapter = HistoryAdapter::new(load_system_prompt(&config.agent).await);
    debug!(
        chars = adapter.system_instruction().chars().count(),
        "system instruction loaded"
    );

    let engine = GenerationFallbackEngine::new(
        backend,
        config.gemini.models.clone(),
        config.gemini.temperature,
    );
    info!(
        candidates = engine.candidates().len(),
        primary = engine.candidates().first().map(String::as_str).unwrap_or("none"),
        available = engine.is_available(),
        "model fallback chain ready"
    );

    TurnProcessor::new(
        history,
        dispatcher,
        engine,
        adapter,
        DiagramRenderer::from_config(&config.diagram),
        ReplyTexts::from_config(config),
    )
}
