use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::storage::errors::StorageError;
use crate::storage::types::CacheData;

pub struct InMemorySessionStore {
    pub(super) entry: Mutex<HashMap<String, (CacheData, DateTime<Utc>)>>,
}

pub struct RedisSessionStore {
    pub(super) client: redis::Client,
}

pub struct SqliteSessionStore {
    pub(super) pool: sqlx::SqlitePool,
}

/// Persistence for session records keyed by the session token.
///
/// Implementations must treat a record whose `expires_at` has passed as absent.
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Initialize the store. This is called once before the store is used.
    async fn init(&self) -> Result<(), StorageError>;

    /// Insert or replace the record for `key`.
    async fn put(
        &self,
        key: &str,
        value: CacheData,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StorageError>;

    /// Get the record for `key`, or `None` if it is missing or expired.
    async fn get(&self, key: &str) -> Result<Option<CacheData>, StorageError>;

    /// Remove the record for `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Delete every expired record and return how many were deleted.
    /// Stores with native expiry have nothing to do here.
    async fn cleanup_expired(&self) -> Result<u64, StorageError> {
        Ok(0)
    }
}
