// SPDX-FileCopyrightText: 2026 Pathsetu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-event turn orchestration.
//!
//! A [`TurnProcessor`] takes one webhook delivery through classification,
//! context assembly, generation, diagram handling, persistence, and delivery.
//! It holds no per-user state; the history store is the only shared resource.
//! Nothing escapes [`TurnProcessor::process_payload`]: errors become user
//! notices or log lines, and panics inside collaborators are caught at the
//! outer boundary.

use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use futures::FutureExt;
use pathsetu_config::PathsetuConfig;
use pathsetu_core::{GenerationError, HistoryStore, InboundEvent, MessageDispatcher};
use serde_json::Value;
use tracing::{debug, error, info};

use crate::context::HistoryAdapter;
use crate::diagram::{self, DiagramRenderer};
use crate::fallback::GenerationFallbackEngine;

/// Keywords that reset the conversation, compared case-insensitively after trimming.
pub const GREETING_KEYWORDS: &[&str] = &["/start", "hi", "hello"];

/// Prompt substituted for audio messages, whose content is never read.
pub const AUDIO_PROMPT: &str =
    "User sent an audio. Reply: 'I heard you, but I can only read text on WhatsApp right now.'";

/// What the history records as the user's side of an audio turn.
pub const AUDIO_DISPLAY_LABEL: &str = "[Audio Message]";

pub const OVERLOAD_NOTICE: &str = "⚠️ Brain Overload: Please wait 1 minute.";

pub const CONFIGURATION_NOTICE: &str =
    "⚠️ Pathsetu is not fully set up yet. Please try again later.";

/// Fixed user-facing texts that come from configuration.
#[derive(Debug, Clone)]
pub struct ReplyTexts {
    pub welcome: String,
    pub diagram_caption: String,
}

impl ReplyTexts {
    pub fn from_config(config: &PathsetuConfig) -> Self {
        Self {
            welcome: config.agent.welcome_message.clone(),
            diagram_caption: config.diagram.caption.clone(),
        }
    }
}

/// How a delivery was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Not a message (status callback or unexpected shape).
    Ignored,
    /// A message type the bot does not answer.
    Unsupported,
    /// Greeting: history cleared and welcome sent.
    Welcomed,
    /// A generated reply was stored and delivered.
    Replied { diagram_sent: bool },
    /// The backend client is unavailable; a notice was sent.
    ConfigurationError,
    /// Every candidate failed; a notice was sent.
    Overloaded,
    /// A collaborator panicked during `step`.
    Failed { step: TurnStep },
}

/// Pipeline stage, recorded so failures can be attributed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TurnStep {
    Classify = 0,
    LoadHistory = 1,
    Generate = 2,
    PostProcess = 3,
    Persist = 4,
    Deliver = 5,
}

impl TurnStep {
    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => TurnStep::LoadHistory,
            2 => TurnStep::Generate,
            3 => TurnStep::PostProcess,
            4 => TurnStep::Persist,
            5 => TurnStep::Deliver,
            _ => TurnStep::Classify,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TurnStep::Classify => "classify",
            TurnStep::LoadHistory => "load_history",
            TurnStep::Generate => "generate",
            TurnStep::PostProcess => "post_process",
            TurnStep::Persist => "persist",
            TurnStep::Deliver => "deliver",
        }
    }
}

impl fmt::Display for TurnStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

struct StepTracker(AtomicU8);

impl StepTracker {
    fn new() -> Self {
        Self(AtomicU8::new(TurnStep::Classify as u8))
    }

    fn enter(&self, step: TurnStep) {
        self.0.store(step as u8, Ordering::Relaxed);
    }

    fn current(&self) -> TurnStep {
        TurnStep::from_u8(self.0.load(Ordering::Relaxed))
    }
}

pub struct TurnProcessor {
    history: Arc<dyn HistoryStore>,
    dispatcher: Arc<dyn MessageDispatcher>,
    engine: GenerationFallbackEngine,
    adapter: HistoryAdapter,
    renderer: DiagramRenderer,
    texts: ReplyTexts,
}

impl TurnProcessor {
    pub fn new(
        history: Arc<dyn HistoryStore>,
        dispatcher: Arc<dyn MessageDispatcher>,
        engine: GenerationFallbackEngine,
        adapter: HistoryAdapter,
        renderer: DiagramRenderer,
        texts: ReplyTexts,
    ) -> Self {
        Self {
            history,
            dispatcher,
            engine,
            adapter,
            renderer,
            texts,
        }
    }

    /// Handles one raw webhook body.
    pub async fn process_payload(&self, payload: &Value) -> TurnOutcome {
        match pathsetu_whatsapp::parse_event(payload) {
            Some(event) => self.process_event(event).await,
            None => {
                debug!("webhook delivery carries no message, ignoring");
                TurnOutcome::Ignored
            }
        }
    }

    /// Handles one classified event, containing any panic raised below.
    pub async fn process_event(&self, event: InboundEvent) -> TurnOutcome {
        let sender_id = event.sender_id().to_string();
        let tracker = StepTracker::new();

        match AssertUnwindSafe(self.run(event, &tracker))
            .catch_unwind()
            .await
        {
            Ok(outcome) => outcome,
            Err(panic) => {
                let step = tracker.current();
                error!(
                    sender_id = %sender_id,
                    step = %step,
                    panic = panic_message(panic.as_ref()),
                    "turn processing aborted"
                );
                TurnOutcome::Failed { step }
            }
        }
    }

    async fn run(&self, event: InboundEvent, tracker: &StepTracker) -> TurnOutcome {
        tracker.enter(TurnStep::Classify);
        let (sender_id, prompt, display_prompt) = match event {
            InboundEvent::TextMessage { sender_id, body } => {
                if is_greeting(&body) {
                    self.history.clear(&sender_id).await;
                    self.dispatcher
                        .send_text(&sender_id, &self.texts.welcome)
                        .await;
                    info!(sender_id = %sender_id, "conversation reset");
                    return TurnOutcome::Welcomed;
                }
                (sender_id, body.clone(), body)
            }
            InboundEvent::AudioMessage { sender_id } => (
                sender_id,
                AUDIO_PROMPT.to_string(),
                AUDIO_DISPLAY_LABEL.to_string(),
            ),
            InboundEvent::Unsupported { sender_id, kind } => {
                debug!(sender_id = %sender_id, kind = %kind, "unsupported message type");
                return TurnOutcome::Unsupported;
            }
        };

        tracker.enter(TurnStep::LoadHistory);
        let snapshot = self.history.get(&sender_id).await;
        let context = self.adapter.build_context(&snapshot, &prompt);

        tracker.enter(TurnStep::Generate);
        let reply = match self.engine.generate(&context).await {
            Ok(reply) => reply,
            Err(GenerationError::ClientUnavailable) => {
                error!(sender_id = %sender_id, "generation backend is not configured");
                self.dispatcher
                    .send_text(&sender_id, CONFIGURATION_NOTICE)
                    .await;
                return TurnOutcome::ConfigurationError;
            }
            Err(GenerationError::AllBackendsExhausted {
                attempts,
                last_error,
            }) => {
                error!(
                    sender_id = %sender_id,
                    attempts,
                    error = %last_error,
                    "all models failed"
                );
                self.dispatcher.send_text(&sender_id, OVERLOAD_NOTICE).await;
                return TurnOutcome::Overloaded;
            }
        };

        tracker.enter(TurnStep::PostProcess);
        let extraction = diagram::extract(&reply);
        let image_url = extraction
            .diagram_spec
            .as_deref()
            .and_then(|spec| self.renderer.resolve_image(spec));
        let diagram_sent = image_url.is_some();
        if let Some(url) = image_url {
            self.dispatcher
                .send_image(&sender_id, &url, &self.texts.diagram_caption)
                .await;
        }

        tracker.enter(TurnStep::Persist);
        self.history
            .append(&sender_id, &display_prompt, &extraction.display_text)
            .await;

        tracker.enter(TurnStep::Deliver);
        self.dispatcher
            .send_text(&sender_id, &extraction.display_text)
            .await;

        info!(sender_id = %sender_id, diagram_sent, "turn completed");
        TurnOutcome::Replied { diagram_sent }
    }
}

fn is_greeting(body: &str) -> bool {
    let normalized = body.trim().to_lowercase();
    GREETING_KEYWORDS.contains(&normalized.as_str())
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> &str {
    panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}
