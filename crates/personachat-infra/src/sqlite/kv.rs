//! SQLite key-value store implementation.
//!
//! Implements `KvStore` from `personachat-core` using sqlx with split
//! read/write pools. Values are opaque text.

use chrono::Utc;
use sqlx::Row;

use personachat_core::storage::kv_store::KvStore;
use personachat_types::error::RepositoryError;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `KvStore`.
pub struct SqliteKvStore {
    pool: DatabasePool,
}

impl SqliteKvStore {
    /// Create a new KV store backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

impl KvStore for SqliteKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let value: String = row
                    .try_get("value")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), RepositoryError> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"INSERT INTO kv_store (key, value, created_at, updated_at)
               VALUES (?, ?, ?, ?)
               ON CONFLICT (key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at"#,
        )
        .bind(key)
        .bind(value)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::database_url;
    use personachat_core::storage::bot_store::{LocalBotStore, MY_BOTS_KEY};
    use personachat_types::bot::{Bot, BotId};

    async fn test_store() -> (SqliteKvStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let pool = DatabasePool::new(&database_url(dir.path())).await.unwrap();
        (SqliteKvStore::new(pool), dir)
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let (store, _dir) = test_store().await;
        assert_eq!(store.get("absent").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let (store, _dir) = test_store().await;
        store.set("greeting", "hello").await.unwrap();
        assert_eq!(store.get("greeting").await.unwrap().as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let (store, _dir) = test_store().await;
        store.set("k", "one").await.unwrap();
        store.set("k", "two").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("two"));
    }

    #[tokio::test]
    async fn test_delete() {
        let (store, _dir) = test_store().await;
        store.set("k", "v").await.unwrap();
        store.delete("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);

        // Deleting again is a no-op.
        store.delete("k").await.unwrap();
    }

    #[tokio::test]
    async fn test_bot_store_over_sqlite() {
        let (kv, _dir) = test_store().await;
        let bots = LocalBotStore::new(kv);

        let bot = Bot {
            id: BotId::new(),
            name: "Luna".to_string(),
            persona: "You are Luna.".to_string(),
            avatar_url: "https://img.example.com/luna.png".to_string(),
            created_at: Utc::now(),
        };
        bots.save(&bot).await.unwrap();
        assert_eq!(bots.list().await, vec![bot.clone()]);

        bots.delete(&bot.id).await.unwrap();
        assert!(bots.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_collection_lists_empty() {
        let (kv, _dir) = test_store().await;
        kv.set(MY_BOTS_KEY, "[{\"broken\":").await.unwrap();

        let bots = LocalBotStore::new(kv);
        assert!(bots.list().await.is_empty());
    }
}
