use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

use crate::storage::errors::StorageError;
use crate::storage::types::CacheData;

use super::types::{SessionStore, SqliteSessionStore};

const TABLE_NAME: &str = "sessions";

impl SqliteSessionStore {
    /// Open a pool for `url`. Accepts either a `sqlite:` URL or a bare file path.
    pub fn new(url: &str) -> Result<Self, StorageError> {
        let opts = if url.starts_with("sqlite:") {
            SqliteConnectOptions::from_str(url)?
        } else {
            SqliteConnectOptions::new().filename(url)
        }
        .create_if_missing(true);

        // Every connection to an in-memory database is a separate database,
        // so the pool must hold exactly one connection forever.
        let pool = if url.contains(":memory:") || url.contains("mode=memory") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_lazy_with(opts)
        } else {
            SqlitePoolOptions::new().connect_lazy_with(opts)
        };

        Ok(Self { pool })
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn init(&self) -> Result<(), StorageError> {
        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {TABLE_NAME} (
                token TEXT PRIMARY KEY NOT NULL,
                data TEXT NOT NULL,
                expiry INTEGER NOT NULL
            )
            "#
        ))
        .execute(&self.pool)
        .await?;

        sqlx::query(&format!(
            "CREATE INDEX IF NOT EXISTS {TABLE_NAME}_expiry_idx ON {TABLE_NAME}(expiry)"
        ))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn put(
        &self,
        key: &str,
        value: CacheData,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        sqlx::query(&format!(
            r#"
            INSERT INTO {TABLE_NAME} (token, data, expiry)
            VALUES ($1, $2, $3)
            ON CONFLICT(token) DO UPDATE SET
                data = excluded.data,
                expiry = excluded.expiry
            "#
        ))
        .bind(key)
        .bind(&value.value)
        .bind(expires_at.timestamp_millis())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<CacheData>, StorageError> {
        let value: Option<String> = sqlx::query_scalar(&format!(
            "SELECT data FROM {TABLE_NAME} WHERE token = $1 AND expiry > $2"
        ))
        .bind(key)
        .bind(Utc::now().timestamp_millis())
        .fetch_optional(&self.pool)
        .await?;

        Ok(value.map(|value| CacheData { value }))
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        sqlx::query(&format!("DELETE FROM {TABLE_NAME} WHERE token = $1"))
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn cleanup_expired(&self) -> Result<u64, StorageError> {
        let result = sqlx::query(&format!("DELETE FROM {TABLE_NAME} WHERE expiry <= $1"))
            .bind(Utc::now().timestamp_millis())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
