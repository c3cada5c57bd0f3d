// SPDX-FileCopyrightText: 2026 Pathsetu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generation backend trait for text-generation model APIs.

use async_trait::async_trait;

use crate::error::PathsetuError;
use crate::traits::adapter::PluginAdapter;
use crate::types::ConversationContext;

/// A text-generation service addressable by model name.
///
/// One call is one attempt: implementations do not retry and enforce their
/// own per-call timeout, reporting it as [`PathsetuError::Timeout`].
#[async_trait]
pub trait GenerationBackend: PluginAdapter {
    /// Generates a reply for `context` using the named model.
    async fn generate(
        &self,
        model: &str,
        context: &ConversationContext,
        temperature: f32,
    ) -> Result<String, PathsetuError>;
}
