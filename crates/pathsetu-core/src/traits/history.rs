// SPDX-FileCopyrightText: 2026 Pathsetu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user conversation history.

use async_trait::async_trait;

use crate::traits::adapter::PluginAdapter;
use crate::types::TurnRecord;

/// Key-value store mapping a user id to its ordered turn records.
///
/// All operations are infallible from the caller's point of view: a failed
/// read returns an empty history and failed writes are dropped. Implementations
/// log the underlying error. Distinct user ids never observe each other's
/// records.
#[async_trait]
pub trait HistoryStore: PluginAdapter {
    /// Returns a snapshot of the user's history in chronological order.
    async fn get(&self, user_id: &str) -> Vec<TurnRecord>;

    /// Appends a user turn followed by a model turn as one unit.
    async fn append(&self, user_id: &str, user_text: &str, reply_text: &str);

    /// Removes every record for the user.
    async fn clear(&self, user_id: &str);
}
