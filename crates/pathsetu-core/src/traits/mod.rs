// SPDX-FileCopyrightText: 2026 Pathsetu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! Collaborators with external I/O extend the [`PluginAdapter`] base trait
//! and use `#[async_trait]` so they can be held as trait objects.

pub mod adapter;
pub mod backend;
pub mod dispatcher;
pub mod history;

pub use adapter::PluginAdapter;
pub use backend::GenerationBackend;
pub use dispatcher::MessageDispatcher;
pub use history::HistoryStore;
