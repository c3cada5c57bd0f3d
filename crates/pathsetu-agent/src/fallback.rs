// SPDX-FileCopyrightText: 2026 Pathsetu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ordered model fallback.
//!
//! Each candidate model gets exactly one attempt, in configured order. The
//! first success is returned; if every candidate fails the last error is
//! carried in [`GenerationError::AllBackendsExhausted`].

use std::sync::Arc;

use pathsetu_core::{ConversationContext, GenerationBackend, GenerationError, PathsetuError};
use tracing::{debug, warn};

pub struct GenerationFallbackEngine {
    backend: Option<Arc<dyn GenerationBackend>>,
    candidates: Vec<String>,
    temperature: f32,
}

impl GenerationFallbackEngine {
    /// `backend` is `None` when the client could not be constructed; every
    /// call then fails with [`GenerationError::ClientUnavailable`].
    pub fn new(
        backend: Option<Arc<dyn GenerationBackend>>,
        candidates: Vec<String>,
        temperature: f32,
    ) -> Self {
        Self {
            backend,
            candidates,
            temperature,
        }
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    pub async fn generate(&self, context: &ConversationContext) -> Result<String, GenerationError> {
        let backend = self
            .backend
            .as_ref()
            .ok_or(GenerationError::ClientUnavailable)?;

        let mut last_error = None;
        for model in &self.candidates {
            match backend.generate(model, context, self.temperature).await {
                Ok(text) => {
                    debug!(model = %model, "candidate succeeded");
                    return Ok(text);
                }
                Err(e) => {
                    warn!(model = %model, error = %e, "candidate failed, trying next");
                    last_error = Some(e);
                }
            }
        }

        Err(GenerationError::AllBackendsExhausted {
            attempts: self.candidates.len(),
            last_error: Box::new(last_error.unwrap_or_else(|| {
                PathsetuError::Internal("no backend candidates configured".into())
            })),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathsetu_core::{ContentBlock, Role};
    use pathsetu_test_utils::ScriptedBackend;

    fn ctx() -> ConversationContext {
        ConversationContext {
            blocks: vec![ContentBlock::new(Role::User, "hi")],
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn third_candidate_wins_after_two_warnings() {
        let backend = Arc::new(
            ScriptedBackend::new()
                .fail("A", "quota exceeded")
                .fail("B", "model not found")
                .reply("C", "from C"),
        );
        let engine = GenerationFallbackEngine::new(
            Some(backend.clone()),
            names(&["A", "B", "C"]),
            0.7,
        );

        assert_eq!(engine.generate(&ctx()).await.unwrap(), "from C");
        assert_eq!(backend.calls().await, names(&["A", "B", "C"]));
        logs_assert(|lines: &[&str]| {
            match lines
                .iter()
                .filter(|l| l.contains("candidate failed, trying next"))
                .count()
            {
                2 => Ok(()),
                n => Err(format!("expected 2 warnings, got {n}")),
            }
        });
    }

    #[tokio::test]
    async fn first_success_short_circuits() {
        let backend = Arc::new(ScriptedBackend::new().reply("A", "ok").reply("B", "unused"));
        let engine =
            GenerationFallbackEngine::new(Some(backend.clone()), names(&["A", "B"]), 0.7);
        assert_eq!(engine.generate(&ctx()).await.unwrap(), "ok");
        assert_eq!(backend.calls().await, names(&["A"]));
    }

    #[tokio::test]
    async fn exhaustion_carries_last_error() {
        let backend = Arc::new(
            ScriptedBackend::new()
                .fail("A", "err-a")
                .fail("B", "err-b")
                .fail("C", "err-c"),
        );
        let engine =
            GenerationFallbackEngine::new(Some(backend.clone()), names(&["A", "B", "C"]), 0.7);

        match engine.generate(&ctx()).await {
            Err(GenerationError::AllBackendsExhausted {
                attempts,
                last_error,
            }) => {
                assert_eq!(attempts, 3);
                assert!(last_error.to_string().contains("err-c"));
            }
            other => panic!("expected exhaustion, got {other:?}"),
        }
        assert_eq!(backend.calls().await.len(), 3);
    }

    #[tokio::test]
    async fn missing_client_consumes_no_candidates() {
        let engine = GenerationFallbackEngine::new(None, names(&["A", "B"]), 0.7);
        assert!(!engine.is_available());
        assert!(matches!(
            engine.generate(&ctx()).await,
            Err(GenerationError::ClientUnavailable)
        ));
    }

    #[tokio::test]
    async fn empty_candidate_list_is_exhausted_immediately() {
        let backend = Arc::new(ScriptedBackend::new());
        let engine = GenerationFallbackEngine::new(Some(backend.clone()), Vec::new(), 0.7);
        match engine.generate(&ctx()).await {
            Err(GenerationError::AllBackendsExhausted { attempts, last_error }) => {
                assert_eq!(attempts, 0);
                assert!(matches!(*last_error, PathsetuError::Internal(_)));
            }
            other => panic!("expected exhaustion, got {other:?}"),
        }
        assert!(backend.calls().await.is_empty());
    }

    #[tokio::test]
    async fn temperature_is_forwarded() {
        let backend = Arc::new(ScriptedBackend::new().reply("A", "ok"));
        let engine = GenerationFallbackEngine::new(Some(backend.clone()), names(&["A"]), 0.25);
        engine.generate(&ctx()).await.unwrap();
        assert_eq!(backend.temperatures().await, vec![0.25]);
    }
}
