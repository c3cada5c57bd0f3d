// SPDX-FileCopyrightText: 2026 Pathsetu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities: scripted backend, recording dispatcher, in-memory history,
//! and an end-to-end harness over a temp SQLite database.

pub mod harness;
pub mod memory_history;
pub mod mock_backend;
pub mod mock_dispatcher;

pub use harness::{TestHarness, TestHarnessBuilder, audio_payload, status_payload, text_payload};
pub use memory_history::MemoryHistoryStore;
pub use mock_backend::ScriptedBackend;
pub use mock_dispatcher::{RecordingDispatcher, Sent};
