// SPDX-FileCopyrightText: 2026 Pathsetu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory [`HistoryStore`].

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use pathsetu_core::{
    AdapterType, HealthStatus, HistoryStore, PathsetuError, PluginAdapter, Role, TurnRecord,
};

#[derive(Default)]
pub struct MemoryHistoryStore {
    records: Mutex<HashMap<String, Vec<TurnRecord>>>,
    appends: Mutex<usize>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a user's history without counting as an append.
    pub async fn seed(&self, user_id: &str, records: Vec<TurnRecord>) {
        self.records.lock().await.insert(user_id.to_string(), records);
    }

    pub async fn snapshot(&self, user_id: &str) -> Vec<TurnRecord> {
        self.records
            .lock()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of `append` calls so far.
    pub async fn append_count(&self) -> usize {
        *self.appends.lock().await
    }
}

#[async_trait]
impl PluginAdapter for MemoryHistoryStore {
    fn name(&self) -> &str {
        "memory-history"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, PathsetuError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), PathsetuError> {
        Ok(())
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn get(&self, user_id: &str) -> Vec<TurnRecord> {
        self.snapshot(user_id).await
    }

    async fn append(&self, user_id: &str, user_text: &str, reply_text: &str) {
        let mut records = self.records.lock().await;
        let entry = records.entry(user_id.to_string()).or_default();
        entry.push(TurnRecord::new(Role::User, user_text));
        entry.push(TurnRecord::new(Role::Model, reply_text));
        *self.appends.lock().await += 1;
    }

    async fn clear(&self, user_id: &str) {
        self.records.lock().await.remove(user_id);
    }
}
