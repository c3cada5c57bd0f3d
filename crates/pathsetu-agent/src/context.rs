// SPDX-FileCopyrightText: 2026 Pathsetu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request context assembly.
//!
//! Converts the loosely-typed persisted history into the role-tagged block
//! sequence a generation backend consumes, with the system instruction first
//! and the current user input last.

use pathsetu_config::model::AgentConfig;
use pathsetu_core::{ContentBlock, ConversationContext, Role, TurnRecord};
use tracing::{info, warn};

/// Instruction used when neither a prompt file nor an inline prompt is configured.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are 'Pathsetu', an AI Career GPS.
RULES:
1. Reply in the same language (English/Hindi/Marathi/Telugu).
2. Keep answers SHORT (max 50 words) for WhatsApp.
3. Be realistic and practical.
4. If asked for a Roadmap, generate Mermaid.js code.";

/// Loads the system instruction following config priority: file > inline > default.
pub async fn load_system_prompt(config: &AgentConfig) -> String {
    if let Some(ref file_path) = config.system_prompt_file {
        match tokio::fs::read_to_string(file_path).await {
            Ok(content) => {
                let trimmed = content.trim();
                if !trimmed.is_empty() {
                    info!(path = file_path.as_str(), "loaded system prompt from file");
                    return trimmed.to_string();
                }
                warn!(path = file_path.as_str(), "system prompt file is empty, falling back");
            }
            Err(e) => {
                warn!(
                    path = file_path.as_str(),
                    error = %e,
                    "failed to read system prompt file, falling back"
                );
            }
        }
    }

    if let Some(ref prompt) = config.system_prompt
        && !prompt.trim().is_empty()
    {
        return prompt.clone();
    }

    DEFAULT_SYSTEM_PROMPT.to_string()
}

/// Builds request contexts around a fixed system instruction.
#[derive(Debug, Clone)]
pub struct HistoryAdapter {
    system_instruction: String,
}

impl HistoryAdapter {
    pub fn new(system_instruction: impl Into<String>) -> Self {
        Self {
            system_instruction: system_instruction.into(),
        }
    }

    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    /// Produces `history.len() + 2` blocks: the system instruction (tagged
    /// as a user turn), one block per record, then `new_user_text`.
    pub fn build_context(&self, history: &[TurnRecord], new_user_text: &str) -> ConversationContext {
        let mut blocks = Vec::with_capacity(history.len() + 2);
        blocks.push(ContentBlock::new(Role::User, self.system_instruction.as_str()));
        blocks.extend(
            history
                .iter()
                .map(|record| ContentBlock::new(record.role(), record.text())),
        );
        blocks.push(ContentBlock::new(Role::User, new_user_text));
        ConversationContext { blocks }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathsetu_core::TurnText;
    use proptest::prelude::*;

    fn record(role: Option<&str>, text: Option<TurnText>) -> TurnRecord {
        TurnRecord {
            role: role.map(String::from),
            text,
        }
    }

    #[test]
    fn empty_history_yields_system_and_prompt() {
        let adapter = HistoryAdapter::new("SYS");
        let ctx = adapter.build_context(&[], "hello there");
        assert_eq!(
            ctx.blocks,
            vec![
                ContentBlock::new(Role::User, "SYS"),
                ContentBlock::new(Role::User, "hello there"),
            ]
        );
    }

    #[test]
    fn records_are_normalized() {
        let adapter = HistoryAdapter::new("SYS");
        let history = vec![
            record(Some("user"), Some(TurnText::Parts(vec!["a".into(), "b".into()]))),
            record(Some("assistant"), Some(TurnText::Single("c".into()))),
            record(Some("model"), None),
            record(None, Some(TurnText::Single("d".into()))),
        ];
        let ctx = adapter.build_context(&history, "P");
        assert_eq!(
            &ctx.blocks[1..5],
            &[
                ContentBlock::new(Role::User, "a b"),
                ContentBlock::new(Role::User, "c"),
                ContentBlock::new(Role::Model, ""),
                ContentBlock::new(Role::User, "d"),
            ]
        );
    }

    #[tokio::test]
    async fn prompt_file_takes_priority() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prompt.md");
        std::fs::write(&path, "  From file.\n").unwrap();

        let config = AgentConfig {
            system_prompt: Some("Inline.".into()),
            system_prompt_file: Some(path.display().to_string()),
            ..Default::default()
        };
        assert_eq!(load_system_prompt(&config).await, "From file.");
    }

    #[tokio::test]
    async fn missing_file_falls_back_to_inline() {
        let config = AgentConfig {
            system_prompt: Some("Inline.".into()),
            system_prompt_file: Some("/nonexistent/prompt.md".into()),
            ..Default::default()
        };
        assert_eq!(load_system_prompt(&config).await, "Inline.");
    }

    #[tokio::test]
    async fn default_prompt_when_unset() {
        let prompt = load_system_prompt(&AgentConfig::default()).await;
        assert!(prompt.starts_with("You are 'Pathsetu'"));
    }

    fn arb_record() -> impl Strategy<Value = TurnRecord> {
        let role = prop::option::of(prop_oneof![
            Just("user".to_string()),
            Just("model".to_string()),
            "[a-z]{1,8}",
        ]);
        let text = prop::option::of(prop_oneof![
            ".{0,20}".prop_map(TurnText::Single),
            prop::collection::vec(".{0,10}", 0..4).prop_map(TurnText::Parts),
        ]);
        (role, text).prop_map(|(role, text)| TurnRecord { role, text })
    }

    proptest! {
        #[test]
        fn context_has_history_plus_two_blocks(
            history in prop::collection::vec(arb_record(), 0..16),
            prompt in ".{0,40}",
        ) {
            let ctx = HistoryAdapter::new("SYS").build_context(&history, &prompt);
            prop_assert_eq!(ctx.len(), history.len() + 2);
            prop_assert_eq!(&ctx.blocks[0], &ContentBlock::new(Role::User, "SYS"));
            let last = ctx.blocks.last().unwrap();
            prop_assert_eq!(last.role, Role::User);
            prop_assert_eq!(&last.text, &prompt);
        }
    }
}
