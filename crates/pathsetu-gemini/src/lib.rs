// SPDX-FileCopyrightText: 2026 Pathsetu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Gemini generation backend.
//!
//! Implements [`GenerationBackend`] over the `generateContent` REST endpoint.
//! The model name is chosen per call so a single backend serves every
//! fallback candidate.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use pathsetu_config::model::GeminiConfig;
use pathsetu_core::{
    AdapterType, ConversationContext, GenerationBackend, HealthStatus, PathsetuError,
    PluginAdapter,
};
use tracing::info;

use crate::client::GeminiClient;
use crate::types::{Content, GenerateContentRequest, GenerationConfig, Part};

/// Gemini backend implementing [`GenerationBackend`].
pub struct GeminiBackend {
    client: GeminiClient,
}

impl GeminiBackend {
    /// Builds the backend from configuration.
    ///
    /// Fails with [`PathsetuError::Config`] when no API key is available from
    /// `gemini.api_key` or the `GEMINI_API_KEY` environment variable.
    pub fn new(config: &GeminiConfig) -> Result<Self, PathsetuError> {
        let api_key = config.resolve_api_key().ok_or_else(|| {
            PathsetuError::Config(
                "Gemini API key not found. Set gemini.api_key in config or the GEMINI_API_KEY environment variable.".into(),
            )
        })?;
        let client = GeminiClient::new(
            &api_key,
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
        )?;
        info!(candidates = config.models.len(), "Gemini backend initialized");
        Ok(Self { client })
    }
}

fn to_request(context: &ConversationContext, temperature: f32) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: context
            .blocks
            .iter()
            .map(|block| Content {
                role: Some(block.role.to_string()),
                parts: vec![Part {
                    text: Some(block.text.clone()),
                }],
            })
            .collect(),
        generation_config: GenerationConfig { temperature },
    }
}

#[async_trait]
impl PluginAdapter for GeminiBackend {
    fn name(&self) -> &str {
        "gemini"
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
impl GenerationBackend for GeminiBackend {
    async fn generate(
        &self,
        model: &str,
        context: &ConversationContext,
        temperature: f32,
    ) -> Result<String, PathsetuError> {
        let response = self
            .client
            .generate_content(model, &to_request(context, temperature))
            .await?;

        response.text().ok_or_else(|| {
            let reason = response
                .prompt_feedback
                .as_ref()
                .and_then(|f| f.block_reason.clone())
                .or_else(|| {
                    response
                        .candidates
                        .first()
                        .and_then(|c| c.finish_reason.clone())
                })
                .unwrap_or_else(|| "no candidates".to_string());
            PathsetuError::provider(format!("Gemini returned no text ({reason})"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathsetu_core::{ContentBlock, Role};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base_url: &str) -> GeminiConfig {
        GeminiConfig {
            api_key: Some("test-key".into()),
            base_url: base_url.to_string(),
            timeout_secs: 5,
            ..Default::default()
        }
    }

    fn context() -> ConversationContext {
        ConversationContext {
            blocks: vec![
                ContentBlock::new(Role::User, "You are a guide."),
                ContentBlock::new(Role::Model, "Earlier reply"),
                ContentBlock::new(Role::User, "Careers in biology?"),
            ],
        }
    }

    #[test]
    fn context_maps_to_contents_in_order() {
        let req = to_request(&context(), 0.7);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["contents"].as_array().unwrap().len(), 3);
        assert_eq!(json["contents"][1]["role"], "model");
        assert_eq!(json["contents"][2]["parts"][0]["text"], "Careers in biology?");
    }

    #[tokio::test]
    async fn generate_posts_context_for_requested_model() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.5-flash-lite:generateContent"))
            .and(body_json(serde_json::json!({
                "contents": [
                    {"role": "user", "parts": [{"text": "You are a guide."}]},
                    {"role": "model", "parts": [{"text": "Earlier reply"}]},
                    {"role": "user", "parts": [{"text": "Careers in biology?"}]}
                ],
                "generationConfig": {"temperature": 0.5}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{"content": {"parts": [{"text": "Try bioinformatics."}]}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let backend = GeminiBackend::new(&config(&server.uri())).unwrap();
        let reply = backend
            .generate("gemini-2.5-flash-lite", &context(), 0.5)
            .await
            .unwrap();
        assert_eq!(reply, "Try bioinformatics.");
    }

    #[tokio::test]
    async fn empty_candidates_are_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{"finishReason": "SAFETY"}]
            })))
            .mount(&server)
            .await;

        let backend = GeminiBackend::new(&config(&server.uri())).unwrap();
        let err = backend.generate("m", &context(), 0.7).await.unwrap_err();
        assert!(err.to_string().contains("SAFETY"), "got: {err}");
    }

    #[test]
    fn blank_key_is_treated_as_missing() {
        let cfg = GeminiConfig {
            api_key: Some("   ".into()),
            ..Default::default()
        };
        // Only assert when the environment does not supply a fallback key.
        if std::env::var(pathsetu_config::model::GEMINI_API_KEY_ENV).is_err() {
            assert!(matches!(
                GeminiBackend::new(&cfg),
                Err(PathsetuError::Config(_))
            ));
        }
    }
}
