// SPDX-FileCopyrightText: 2026 Pathsetu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dispatcher that records outbound messages instead of sending them.

use async_trait::async_trait;
use tokio::sync::Mutex;

use pathsetu_core::{AdapterType, HealthStatus, MessageDispatcher, PathsetuError, PluginAdapter};

/// One captured outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text { to: String, body: String },
    Image { to: String, url: String, caption: String },
}

#[derive(Default)]
pub struct RecordingDispatcher {
    sent: Mutex<Vec<Sent>>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything sent, in order.
    pub async fn sent(&self) -> Vec<Sent> {
        self.sent.lock().await.clone()
    }

    /// Bodies of text messages only.
    pub async fn texts(&self) -> Vec<String> {
        self.sent
            .lock()
            .await
            .iter()
            .filter_map(|s| match s {
                Sent::Text { body, .. } => Some(body.clone()),
                Sent::Image { .. } => None,
            })
            .collect()
    }

    /// URLs of image messages only.
    pub async fn images(&self) -> Vec<String> {
        self.sent
            .lock()
            .await
            .iter()
            .filter_map(|s| match s {
                Sent::Image { url, .. } => Some(url.clone()),
                Sent::Text { .. } => None,
            })
            .collect()
    }
}

#[async_trait]
impl PluginAdapter for RecordingDispatcher {
    fn name(&self) -> &str {
        "recording-dispatcher"
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
impl MessageDispatcher for RecordingDispatcher {
    async fn send_text(&self, to: &str, body: &str) {
        self.sent.lock().await.push(Sent::Text {
            to: to.to_string(),
            body: body.to_string(),
        });
    }

    async fn send_image(&self, to: &str, image_url: &str, caption: &str) {
        self.sent.lock().await.push(Sent::Image {
            to: to.to_string(),
            url: image_url.to_string(),
            caption: caption.to_string(),
        });
    }
}
