use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::storage::errors::StorageError;
use crate::storage::types::CacheData;

use super::types::{InMemorySessionStore, SessionStore};

const SESSION_PREFIX: &str = "session";

impl InMemorySessionStore {
    pub fn new() -> Self {
        tracing::info!("Creating new in-memory session store");
        Self {
            entry: Mutex::new(HashMap::new()),
        }
    }

    fn make_key(key: &str) -> String {
        format!("{SESSION_PREFIX}:{key}")
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn init(&self) -> Result<(), StorageError> {
        Ok(()) // Nothing to initialize for in-memory store
    }

    async fn put(
        &self,
        key: &str,
        value: CacheData,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        self.entry
            .lock()
            .await
            .insert(Self::make_key(key), (value, expires_at));
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<CacheData>, StorageError> {
        let key = Self::make_key(key);
        let mut entry = self.entry.lock().await;

        match entry.get(&key) {
            Some((_, expires_at)) if *expires_at <= Utc::now() => {
                entry.remove(&key);
                Ok(None)
            }
            Some((value, _)) => Ok(Some(value.clone())),
            None => Ok(None),
        }
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entry.lock().await.remove(&Self::make_key(key));
        Ok(())
    }

    async fn cleanup_expired(&self) -> Result<u64, StorageError> {
        let now = Utc::now();
        let mut entry = self.entry.lock().await;
        let before = entry.len();
        entry.retain(|_, (_, expires_at)| *expires_at > now);
        Ok((before - entry.len()) as u64)
    }
}
