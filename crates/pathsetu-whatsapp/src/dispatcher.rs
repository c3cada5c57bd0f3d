// SPDX-FileCopyrightText: 2026 Pathsetu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound delivery through the Cloud API `messages` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use pathsetu_config::model::WhatsAppConfig;
use pathsetu_core::{
    AdapterType, HealthStatus, MessageDispatcher, PathsetuError, PluginAdapter,
};
use tracing::{debug, warn};

use crate::types::{GraphErrorResponse, OutboundMessage, SendResponse};

const SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// Sends text and image messages from one business phone number.
pub struct WhatsAppDispatcher {
    client: reqwest::Client,
    access_token: String,
    messages_url: String,
}

impl WhatsAppDispatcher {
    /// Builds a dispatcher; both the access token and the phone number id
    /// must be configured.
    pub fn new(config: &WhatsAppConfig) -> Result<Self, PathsetuError> {
        let access_token = config
            .access_token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| PathsetuError::Config("whatsapp.access_token is not set".into()))?;
        let phone_number_id = config
            .phone_number_id
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| PathsetuError::Config("whatsapp.phone_number_id is not set".into()))?;

        let client = reqwest::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .map_err(|e| PathsetuError::Channel {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            access_token,
            messages_url: format!(
                "{}/{}/{}/messages",
                config.base_url.trim_end_matches('/'),
                config.api_version,
                phone_number_id
            ),
        })
    }

    /// Posts one message and returns the platform's verdict.
    pub async fn post(&self, message: &OutboundMessage) -> Result<SendResponse, PathsetuError> {
        let response = self
            .client
            .post(&self.messages_url)
            .bearer_auth(&self.access_token)
            .json(message)
            .send()
            .await
            .map_err(|e| PathsetuError::Channel {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        debug!(status = %status, to = %message.to, "messages endpoint responded");

        if !status.is_success() {
            let message = match serde_json::from_str::<GraphErrorResponse>(&body) {
                Ok(err) => format!(
                    "WhatsApp API error ({}, code {}): {}",
                    err.error.kind.as_deref().unwrap_or("unknown"),
                    err.error.code.unwrap_or_default(),
                    err.error.message
                ),
                Err(_) => format!("WhatsApp API returned {status}: {body}"),
            };
            return Err(PathsetuError::channel(message));
        }

        Ok(serde_json::from_str(&body).unwrap_or_default())
    }
}

#[async_trait]
impl PluginAdapter for WhatsAppDispatcher {
    fn name(&self) -> &str {
        "whatsapp"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, PathsetuError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), PathsetuError> {
        Ok(())
    }
}

#[async_trait]
impl MessageDispatcher for WhatsAppDispatcher {
    async fn send_text(&self, to: &str, body: &str) {
        if let Err(e) = self.post(&OutboundMessage::text(to, body)).await {
            warn!(to, error = %e, "text send failed");
        }
    }

    async fn send_image(&self, to: &str, image_url: &str, caption: &str) {
        if let Err(e) = self.post(&OutboundMessage::image(to, image_url, caption)).await {
            warn!(to, error = %e, "image send failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base_url: &str) -> WhatsAppConfig {
        WhatsAppConfig {
            access_token: Some("EAAG-token".into()),
            phone_number_id: Some("1055".into()),
            base_url: base_url.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn missing_credentials_are_config_errors() {
        let mut cfg = config("http://localhost");
        cfg.access_token = None;
        assert!(matches!(
            WhatsAppDispatcher::new(&cfg),
            Err(PathsetuError::Config(_))
        ));

        let mut cfg = config("http://localhost");
        cfg.phone_number_id = Some(" ".into());
        assert!(matches!(
            WhatsAppDispatcher::new(&cfg),
            Err(PathsetuError::Config(_))
        ));
    }

    #[tokio::test]
    async fn send_text_posts_bearer_authenticated_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v17.0/1055/messages"))
            .and(header("authorization", "Bearer EAAG-token"))
            .and(body_json(serde_json::json!({
                "messaging_product": "whatsapp",
                "to": "9198",
                "type": "text",
                "text": {"body": "hello"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "messaging_product": "whatsapp",
                "messages": [{"id": "wamid.X"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dispatcher = WhatsAppDispatcher::new(&config(&server.uri())).unwrap();
        dispatcher.send_text("9198", "hello").await;
    }

    #[tokio::test]
    async fn post_returns_message_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "messages": [{"id": "wamid.Y"}]
            })))
            .mount(&server)
            .await;

        let dispatcher = WhatsAppDispatcher::new(&config(&server.uri())).unwrap();
        let resp = dispatcher
            .post(&OutboundMessage::image("9198", "https://img", "cap"))
            .await
            .unwrap();
        assert_eq!(resp.messages[0].id, "wamid.Y");
    }

    #[tokio::test]
    async fn graph_error_is_reported_by_post() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": {"message": "Invalid OAuth access token.", "type": "OAuthException", "code": 190}
            })))
            .mount(&server)
            .await;

        let dispatcher = WhatsAppDispatcher::new(&config(&server.uri())).unwrap();
        let err = dispatcher
            .post(&OutboundMessage::text("9198", "x"))
            .await
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("OAuthException"), "got: {msg}");
        assert!(msg.contains("190"), "got: {msg}");
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn trait_send_swallows_failures() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let dispatcher = WhatsAppDispatcher::new(&config(&server.uri())).unwrap();
        dispatcher.send_image("9198", "https://img", "cap").await;
        assert!(logs_contain("image send failed"));
    }
}
