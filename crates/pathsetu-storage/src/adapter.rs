// SPDX-FileCopyrightText: 2026 Pathsetu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the [`HistoryStore`] trait.

use async_trait::async_trait;
use pathsetu_config::model::StorageConfig;
use pathsetu_core::{
    AdapterType, HealthStatus, HistoryStore, PathsetuError, PluginAdapter, TurnRecord,
};
use tokio::sync::OnceCell;
use tracing::{debug, error};

use crate::database::{Database, map_tr_err};
use crate::queries;

/// SQLite-backed conversation history.
///
/// The database is opened by [`SqliteHistoryStore::initialize`]. The
/// fallible inherent methods report storage errors; the [`HistoryStore`]
/// implementation logs and swallows them.
pub struct SqliteHistoryStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteHistoryStore {
    /// Create a store for the configured database path without opening it.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Wrap an already-open database (used with in-memory databases).
    pub fn with_database(config: StorageConfig, db: Database) -> Self {
        Self {
            config,
            db: OnceCell::new_with(Some(db)),
        }
    }

    /// Opens the database and applies migrations.
    pub async fn initialize(&self) -> Result<(), PathsetuError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| PathsetuError::Storage {
            source: "history store already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite history store initialized");
        Ok(())
    }

    fn db(&self) -> Result<&Database, PathsetuError> {
        self.db.get().ok_or_else(|| PathsetuError::Storage {
            source: "history store not initialized -- call initialize() first".into(),
        })
    }

    pub async fn try_get(&self, user_id: &str) -> Result<Vec<TurnRecord>, PathsetuError> {
        queries::history::get_turns(self.db()?, user_id, self.config.max_history_records).await
    }

    pub async fn try_append(
        &self,
        user_id: &str,
        user_text: &str,
        reply_text: &str,
    ) -> Result<(), PathsetuError> {
        queries::history::append_turn(self.db()?, user_id, user_text, reply_text).await
    }

    pub async fn try_clear(&self, user_id: &str) -> Result<usize, PathsetuError> {
        queries::history::clear_turns(self.db()?, user_id).await
    }
}

#[async_trait]
impl PluginAdapter for SqliteHistoryStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, PathsetuError> {
        let Ok(db) = self.db() else {
            return Ok(HealthStatus::Unhealthy("not initialized".into()));
        };
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), PathsetuError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl HistoryStore for SqliteHistoryStore {
    async fn get(&self, user_id: &str) -> Vec<TurnRecord> {
        self.try_get(user_id).await.unwrap_or_else(|e| {
            error!(user_id, error = %e, "history read failed, continuing with empty history");
            Vec::new()
        })
    }

    async fn append(&self, user_id: &str, user_text: &str, reply_text: &str) {
        if let Err(e) = self.try_append(user_id, user_text, reply_text).await {
            error!(user_id, error = %e, "history append failed, turn dropped");
        }
    }

    async fn clear(&self, user_id: &str) {
        match self.try_clear(user_id).await {
            Ok(removed) => debug!(user_id, removed, "history cleared"),
            Err(e) => error!(user_id, error = %e, "history clear failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_for(dir: &tempfile::TempDir) -> StorageConfig {
        StorageConfig {
            database_path: dir.path().join("history.db").display().to_string(),
            wal_mode: true,
            max_history_records: None,
        }
    }

    #[tokio::test]
    async fn round_trip_through_trait() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteHistoryStore::new(config_for(&dir));
        store.initialize().await.unwrap();

        store.append("9198", "what is data science?", "A field...").await;
        let history = store.get("9198").await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].text(), "A field...");

        store.clear("9198").await;
        assert!(store.get("9198").await.is_empty());
        store.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn double_initialize_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteHistoryStore::new(config_for(&dir));
        store.initialize().await.unwrap();
        assert!(store.initialize().await.is_err());
    }

    #[tokio::test]
    async fn health_reflects_initialization() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteHistoryStore::new(config_for(&dir));
        assert!(matches!(
            store.health_check().await.unwrap(),
            HealthStatus::Unhealthy(_)
        ));
        store.initialize().await.unwrap();
        assert_eq!(store.health_check().await.unwrap(), HealthStatus::Healthy);
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn uninitialized_store_degrades_to_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteHistoryStore::new(config_for(&dir));

        assert!(store.get("9198").await.is_empty());
        store.append("9198", "q", "a").await;
        store.clear("9198").await;

        assert!(logs_contain("history read failed"));
        assert!(logs_contain("history append failed"));
        assert!(logs_contain("history clear failed"));
    }

    #[tokio::test]
    async fn configured_cap_limits_snapshot() {
        let db = Database::open_in_memory().await.unwrap();
        let config = StorageConfig {
            database_path: ":memory:".into(),
            wal_mode: false,
            max_history_records: Some(2),
        };
        let store = SqliteHistoryStore::with_database(config, db);
        store.append("u", "q1", "a1").await;
        store.append("u", "q2", "a2").await;

        let texts: Vec<String> = store.get("u").await.iter().map(TurnRecord::text).collect();
        assert_eq!(texts, vec!["q2", "a2"]);
    }
}
