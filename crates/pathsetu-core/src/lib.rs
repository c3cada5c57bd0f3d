// SPDX-FileCopyrightText: 2026 Pathsetu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Pathsetu.
//!
//! This crate provides the trait definitions, error types, and conversation
//! types used throughout the workspace. Storage, generation, and messaging
//! adapters all implement traits defined here.

pub mod error;
pub mod traits;
pub mod types;

pub use error::{GenerationError, PathsetuError};
pub use types::{
    AdapterType, ContentBlock, ConversationContext, HealthStatus, InboundEvent, Role, TurnRecord,
    TurnText,
};

pub use traits::{GenerationBackend, HistoryStore, MessageDispatcher, PluginAdapter};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pathsetu_error_has_all_variants() {
        let _config = PathsetuError::Config("test".into());
        let _storage = PathsetuError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _channel = PathsetuError::channel("test");
        let _provider = PathsetuError::provider("test");
        let _timeout = PathsetuError::Timeout {
            duration: std::time::Duration::from_secs(30),
        };
        let _internal = PathsetuError::Internal("test".into());
    }

    #[test]
    fn exhausted_error_reports_last_error() {
        let err = GenerationError::AllBackendsExhausted {
            attempts: 3,
            last_error: Box::new(PathsetuError::provider("quota exceeded")),
        };
        let msg = err.to_string();
        assert!(msg.contains("all 3 backend candidates failed"));
        assert!(msg.contains("quota exceeded"));
    }

    #[test]
    fn adapter_type_round_trips_through_strings() {
        use std::str::FromStr;

        for variant in [AdapterType::Channel, AdapterType::Provider, AdapterType::Storage] {
            let s = variant.to_string();
            let parsed = AdapterType::from_str(&s).expect("should parse back");
            assert_eq!(variant, parsed);
        }
    }

    #[test]
    fn health_status_variants() {
        let healthy = HealthStatus::Healthy;
        assert_ne!(HealthStatus::Degraded("slow".into()), healthy);
        assert_ne!(HealthStatus::Unhealthy("down".into()), healthy);
    }

    #[test]
    fn all_traits_are_exported() {
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_history_store<T: HistoryStore>() {}
        fn _assert_generation_backend<T: GenerationBackend>() {}
        fn _assert_message_dispatcher<T: MessageDispatcher>() {}
    }
}
