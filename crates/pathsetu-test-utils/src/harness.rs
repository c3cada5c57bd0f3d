// SPDX-FileCopyrightText: 2026 Pathsetu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end test harness.
//!
//! `TestHarness` wires a real [`TurnProcessor`] to a temp-file SQLite
//! history store, a [`ScriptedBackend`], and a [`RecordingDispatcher`], and
//! drives it with webhook-shaped JSON payloads.

use std::sync::Arc;

use pathsetu_agent::{TurnOutcome, TurnProcessor, build_turn_processor};
use pathsetu_config::PathsetuConfig;
use pathsetu_core::{GenerationBackend, PathsetuError};
use pathsetu_storage::SqliteHistoryStore;
use serde_json::{Value, json};

use crate::mock_backend::ScriptedBackend;
use crate::mock_dispatcher::RecordingDispatcher;

/// Webhook body for a text message.
pub fn text_payload(sender_id: &str, body: &str) -> Value {
    message_payload(json!({
        "from": sender_id,
        "id": "wamid.test",
        "timestamp": "1700000000",
        "type": "text",
        "text": {"body": body}
    }))
}

/// Webhook body for a voice note.
pub fn audio_payload(sender_id: &str) -> Value {
    message_payload(json!({
        "from": sender_id,
        "id": "wamid.test",
        "type": "audio",
        "audio": {"id": "media.test", "mime_type": "audio/ogg; codecs=opus"}
    }))
}

/// Webhook body for a delivery-status callback (no message).
pub fn status_payload() -> Value {
    json!({
        "object": "whatsapp_business_account",
        "entry": [{"changes": [{"field": "messages", "value": {
            "messaging_product": "whatsapp",
            "statuses": [{"id": "wamid.test", "status": "delivered"}]
        }}]}]
    })
}

fn message_payload(message: Value) -> Value {
    json!({
        "object": "whatsapp_business_account",
        "entry": [{"id": "waba.test", "changes": [{"field": "messages", "value": {
            "messaging_product": "whatsapp",
            "metadata": {"phone_number_id": "1055"},
            "messages": [message]
        }}]}]
    })
}

pub struct TestHarnessBuilder {
    backend: Option<ScriptedBackend>,
    candidates: Option<Vec<String>>,
    system_prompt: Option<String>,
    max_history_records: Option<usize>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            backend: Some(ScriptedBackend::new()),
            candidates: None,
            system_prompt: None,
            max_history_records: None,
        }
    }

    /// Use a pre-scripted backend.
    pub fn with_backend(mut self, backend: ScriptedBackend) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Simulate a backend client that could not be constructed.
    pub fn without_backend(mut self) -> Self {
        self.backend = None;
        self
    }

    pub fn with_candidates(mut self, candidates: &[&str]) -> Self {
        self.candidates = Some(candidates.iter().map(|c| c.to_string()).collect());
        self
    }

    pub fn with_system_prompt(mut self, prompt: &str) -> Self {
        self.system_prompt = Some(prompt.to_string());
        self
    }

    pub fn with_history_cap(mut self, records: usize) -> Self {
        self.max_history_records = Some(records);
        self
    }

    pub async fn build(self) -> Result<TestHarness, PathsetuError> {
        let temp_dir = tempfile::tempdir().map_err(|e| PathsetuError::Internal(e.to_string()))?;

        let mut config = PathsetuConfig::default();
        config.storage.database_path = temp_dir.path().join("history.db").display().to_string();
        config.storage.max_history_records = self.max_history_records;
        if let Some(candidates) = self.candidates {
            config.gemini.models = candidates;
        }
        config.agent.system_prompt = self.system_prompt;

        let history = Arc::new(SqliteHistoryStore::new(config.storage.clone()));
        history.initialize().await?;

        let backend_present = self.backend.is_some();
        let backend = Arc::new(self.backend.unwrap_or_default());
        let generation: Option<Arc<dyn GenerationBackend>> = if backend_present {
            Some(backend.clone())
        } else {
            None
        };
        let dispatcher = Arc::new(RecordingDispatcher::new());

        let processor =
            build_turn_processor(&config, history.clone(), dispatcher.clone(), generation).await;

        Ok(TestHarness {
            processor: Arc::new(processor),
            backend,
            dispatcher,
            history,
            config,
            _temp_dir: temp_dir,
        })
    }
}

pub struct TestHarness {
    pub processor: Arc<TurnProcessor>,
    pub backend: Arc<ScriptedBackend>,
    pub dispatcher: Arc<RecordingDispatcher>,
    pub history: Arc<SqliteHistoryStore>,
    pub config: PathsetuConfig,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    pub async fn send_text(&self, sender_id: &str, body: &str) -> TurnOutcome {
        self.processor
            .process_payload(&text_payload(sender_id, body))
            .await
    }

    pub async fn send_audio(&self, sender_id: &str) -> TurnOutcome {
        self.processor.process_payload(&audio_payload(sender_id)).await
    }
}
