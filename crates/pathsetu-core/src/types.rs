// SPDX-FileCopyrightText: 2026 Pathsetu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation and adapter types shared across the Pathsetu workspace.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AdapterType {
    Channel,
    Provider,
    Storage,
}

/// Author of a turn or context block.
///
/// Only two roles exist. Anything else found in persisted history is read
/// back as [`Role::User`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    /// Normalizes a loosely-typed stored role string.
    pub fn normalize(raw: Option<&str>) -> Self {
        match raw {
            Some("model") => Role::Model,
            _ => Role::User,
        }
    }
}

/// Text payload of a persisted turn, either a plain string or a list of parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TurnText {
    Single(String),
    Parts(Vec<String>),
}

impl TurnText {
    /// Flattens the payload; parts are joined with a single space.
    pub fn flatten(&self) -> String {
        match self {
            TurnText::Single(s) => s.clone(),
            TurnText::Parts(parts) => parts.join(" "),
        }
    }
}

/// A turn as it is persisted by a [`HistoryStore`](crate::HistoryStore).
///
/// Both fields are optional because history may have been written by older
/// builds or other tools. The text field is accepted under either `text` or
/// `parts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, alias = "parts")]
    pub text: Option<TurnText>,
}

impl TurnRecord {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role: Some(role.to_string()),
            text: Some(TurnText::Parts(vec![text.into()])),
        }
    }

    pub fn role(&self) -> Role {
        Role::normalize(self.role.as_deref())
    }

    /// Returns the flattened text, or an empty string when absent.
    pub fn text(&self) -> String {
        self.text.as_ref().map(TurnText::flatten).unwrap_or_default()
    }
}

/// One role-tagged block of a request context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentBlock {
    pub role: Role,
    pub text: String,
}

impl ContentBlock {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }
}

/// Ordered context sent to a generation backend for a single request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationContext {
    pub blocks: Vec<ContentBlock>,
}

impl ConversationContext {
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// A classified inbound webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// A text message.
    TextMessage { sender_id: String, body: String },
    /// A voice note or audio attachment. The content itself is not read.
    AudioMessage { sender_id: String },
    /// Any other message type (image, sticker, location, ...).
    Unsupported { sender_id: String, kind: String },
}

impl InboundEvent {
    pub fn sender_id(&self) -> &str {
        match self {
            InboundEvent::TextMessage { sender_id, .. }
            | InboundEvent::AudioMessage { sender_id }
            | InboundEvent::Unsupported { sender_id, .. } => sender_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_roles_normalize_to_user() {
        assert_eq!(Role::normalize(Some("assistant")), Role::User);
        assert_eq!(Role::normalize(Some("MODEL")), Role::User);
        assert_eq!(Role::normalize(None), Role::User);
        assert_eq!(Role::normalize(Some("model")), Role::Model);
    }

    #[test]
    fn turn_record_accepts_parts_alias() {
        let rec: TurnRecord =
            serde_json::from_str(r#"{"role":"model","parts":["a","b"]}"#).unwrap();
        assert_eq!(rec.role(), Role::Model);
        assert_eq!(rec.text(), "a b");
    }

    #[test]
    fn turn_record_accepts_plain_text() {
        let rec: TurnRecord = serde_json::from_str(r#"{"text":"hello"}"#).unwrap();
        assert_eq!(rec.role(), Role::User);
        assert_eq!(rec.text(), "hello");
    }

    #[test]
    fn turn_record_missing_text_is_empty() {
        let rec: TurnRecord = serde_json::from_str(r#"{"role":"user"}"#).unwrap();
        assert_eq!(rec.text(), "");
    }

    #[test]
    fn new_turn_record_serializes_as_parts_list() {
        let rec = TurnRecord::new(Role::Model, "hi there");
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["role"], "model");
        assert_eq!(json["text"], serde_json::json!(["hi there"]));
    }

    #[test]
    fn inbound_event_sender_id() {
        let ev = InboundEvent::AudioMessage {
            sender_id: "9199".into(),
        };
        assert_eq!(ev.sender_id(), "9199");
    }
}
