use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::{self, AsyncCommands};

use crate::storage::errors::StorageError;
use crate::storage::types::CacheData;

use super::types::{RedisSessionStore, SessionStore};

const SESSION_PREFIX: &str = "session";

impl RedisSessionStore {
    pub fn new(url: &str) -> Result<Self, StorageError> {
        let client = redis::Client::open(url)?;
        Ok(Self { client })
    }

    fn make_key(key: &str) -> String {
        format!("{SESSION_PREFIX}:{key}")
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn init(&self) -> Result<(), StorageError> {
        // Verify the connection works
        let _conn = self.client.get_multiplexed_async_connection().await?;
        Ok(())
    }

    async fn put(
        &self,
        key: &str,
        value: CacheData,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let ttl = (expires_at - Utc::now()).num_seconds();
        let key = Self::make_key(key);
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        if ttl <= 0 {
            let _: () = conn.del(&key).await?;
            return Ok(());
        }

        let value = serde_json::to_string(&value)?;
        let _: () = conn.set_ex(&key, value, ttl as u64).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<CacheData>, StorageError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let key = Self::make_key(key);
        let value: Option<String> = conn.get(&key).await?;

        match value {
            Some(v) => Ok(Some(serde_json::from_str(&v)?)),
            None => Ok(None),
        }
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let key = Self::make_key(key);
        let _: () = conn.del(&key).await?;
        Ok(())
    }
}
