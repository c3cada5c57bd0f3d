// SPDX-FileCopyrightText: 2026 Pathsetu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted generation backend.
//!
//! Each model name gets its own queue of outcomes. The final outcome in a
//! queue repeats, so a single `.reply(model, ..)` answers every call.
//! Calls to a model without a script fail with a provider error.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use tokio::sync::Mutex;

use pathsetu_core::{
    AdapterType, ConversationContext, GenerationBackend, HealthStatus, PathsetuError,
    PluginAdapter,
};

#[derive(Debug, Clone)]
enum Scripted {
    Reply(String),
    Fail(String),
    Panic,
}

#[derive(Default)]
pub struct ScriptedBackend {
    script: Mutex<HashMap<String, VecDeque<Scripted>>>,
    calls: Mutex<Vec<String>>,
    temperatures: Mutex<Vec<f32>>,
    contexts: Mutex<Vec<ConversationContext>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, model: &str, outcome: Scripted) -> Self {
        self.script
            .get_mut()
            .entry(model.to_string())
            .or_default()
            .push_back(outcome);
        self
    }

    /// Queue a successful reply for `model`.
    pub fn reply(self, model: &str, text: &str) -> Self {
        self.push(model, Scripted::Reply(text.to_string()))
    }

    /// Queue a provider error for `model`.
    pub fn fail(self, model: &str, message: &str) -> Self {
        self.push(model, Scripted::Fail(message.to_string()))
    }

    /// Make calls to `model` panic.
    pub fn panic_on(self, model: &str) -> Self {
        self.push(model, Scripted::Panic)
    }

    /// Model names in call order.
    pub async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }

    pub async fn temperatures(&self) -> Vec<f32> {
        self.temperatures.lock().await.clone()
    }

    /// Contexts received, one per call.
    pub async fn contexts(&self) -> Vec<ConversationContext> {
        self.contexts.lock().await.clone()
    }

    async fn next_outcome(&self, model: &str) -> Option<Scripted> {
        let mut script = self.script.lock().await;
        let queue = script.get_mut(model)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait]
impl PluginAdapter for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted-backend"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, PathsetuError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), PathsetuError> {
        Ok(())
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    async fn generate(
        &self,
        model: &str,
        context: &ConversationContext,
        temperature: f32,
    ) -> Result<String, PathsetuError> {
        self.calls.lock().await.push(model.to_string());
        self.temperatures.lock().await.push(temperature);
        self.contexts.lock().await.push(context.clone());

        match self.next_outcome(model).await {
            Some(Scripted::Reply(text)) => Ok(text),
            Some(Scripted::Fail(message)) => Err(PathsetuError::provider(message)),
            Some(Scripted::Panic) => panic!("scripted panic for model {model}"),
            None => Err(PathsetuError::provider(format!(
                "no scripted response for model {model}"
            ))),
        }
    }
}
