// SPDX-FileCopyrightText: 2026 Pathsetu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cloud API wire types for inbound webhooks and outbound messages.

use serde::{Deserialize, Serialize};

// --- Inbound webhook ---

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub entry: Vec<WebhookEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookEntry {
    #[serde(default)]
    pub changes: Vec<WebhookChange>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookChange {
    #[serde(default)]
    pub value: WebhookValue,
}

/// The `value` object of a change. Delivery-status callbacks carry
/// `statuses` and no `messages`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookValue {
    #[serde(default)]
    pub messages: Vec<WebhookMessage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookMessage {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub text: Option<TextBody>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextBody {
    #[serde(default)]
    pub body: Option<String>,
}

// --- Outbound ---

/// A `POST /{phone_number_id}/messages` request body.
#[derive(Debug, Clone, Serialize)]
pub struct OutboundMessage {
    pub messaging_product: &'static str,
    pub to: String,
    #[serde(flatten)]
    pub body: OutboundBody,
}

impl OutboundMessage {
    pub fn text(to: &str, body: &str) -> Self {
        Self {
            messaging_product: "whatsapp",
            to: to.to_string(),
            body: OutboundBody::Text {
                text: OutboundText {
                    body: body.to_string(),
                },
            },
        }
    }

    pub fn image(to: &str, link: &str, caption: &str) -> Self {
        Self {
            messaging_product: "whatsapp",
            to: to.to_string(),
            body: OutboundBody::Image {
                image: OutboundImage {
                    link: link.to_string(),
                    caption: caption.to_string(),
                },
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutboundBody {
    Text { text: OutboundText },
    Image { image: OutboundImage },
}

#[derive(Debug, Clone, Serialize)]
pub struct OutboundText {
    pub body: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutboundImage {
    pub link: String,
    pub caption: String,
}

/// Successful send response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SendResponse {
    #[serde(default)]
    pub messages: Vec<SentMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SentMessage {
    pub id: String,
}

/// Graph API error envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphErrorResponse {
    pub error: GraphError,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphError {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}
