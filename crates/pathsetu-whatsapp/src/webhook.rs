// SPDX-FileCopyrightText: 2026 Pathsetu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound webhook classification.

use pathsetu_core::InboundEvent;
use serde::Deserialize;
use serde_json::Value;

use crate::types::{WebhookMessage, WebhookPayload};

/// Extracts the first message of a webhook delivery.
///
/// The message is read from `entry[0].changes[0].value.messages[0]`. Any
/// deviation from that shape (status callbacks, empty arrays, wrong types,
/// a missing sender) yields `None`.
pub fn parse_event(payload: &Value) -> Option<InboundEvent> {
    let payload = WebhookPayload::deserialize(payload).ok()?;
    let message = payload
        .entry
        .into_iter()
        .next()?
        .changes
        .into_iter()
        .next()?
        .value
        .messages
        .into_iter()
        .next()?;
    classify(message)
}

fn classify(message: WebhookMessage) -> Option<InboundEvent> {
    let sender_id = message.from.filter(|s| !s.is_empty())?;
    let kind = message.kind.unwrap_or_default();

    let event = match (kind.as_str(), message.text.and_then(|t| t.body)) {
        ("text", Some(body)) => InboundEvent::TextMessage { sender_id, body },
        ("audio", _) => InboundEvent::AudioMessage { sender_id },
        _ => InboundEvent::Unsupported { sender_id, kind },
    };
    Some(event)
}
