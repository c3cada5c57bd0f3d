// SPDX-FileCopyrightText: 2026 Pathsetu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound message delivery.

use async_trait::async_trait;

use crate::traits::adapter::PluginAdapter;

/// Sends replies over the messaging platform's outbound API.
///
/// Delivery is fire-and-forget: failures are logged by the implementation
/// and never reported back to the caller.
#[async_trait]
pub trait MessageDispatcher: PluginAdapter {
    /// Sends a plain-text message.
    async fn send_text(&self, to: &str, body: &str);

    /// Sends an image by URL with a caption.
    async fn send_image(&self, to: &str, image_url: &str, caption: &str);
}
