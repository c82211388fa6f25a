use std::{fmt, str::FromStr, sync::Arc};

use crate::storage::errors::StorageError;

use super::types::{InMemorySessionStore, RedisSessionStore, SessionStore, SqliteSessionStore};

/// Backend selected by `SESSION_STORE_TYPE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStoreType {
    Memory,
    #[default]
    Sqlite,
    Redis,
}

impl SessionStoreType {
    /// Whether this backend needs a location (`DATABASE`).
    pub fn requires_url(&self) -> bool {
        !matches!(self, Self::Memory)
    }
}

impl FromStr for SessionStoreType {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "sqlite" => Ok(Self::Sqlite),
            "redis" => Ok(Self::Redis),
            other => Err(StorageError::UnsupportedType(other.to_string())),
        }
    }
}

impl fmt::Display for SessionStoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Memory => "memory",
            Self::Sqlite => "sqlite",
            Self::Redis => "redis",
        };
        f.write_str(name)
    }
}

/// Build and initialize the session store for `store_type`.
pub async fn create_session_store(
    store_type: SessionStoreType,
    store_url: Option<&str>,
) -> Result<Arc<dyn SessionStore>, StorageError> {
    tracing::info!(
        "Initializing session store with type: {}, url: {:?}",
        store_type,
        store_url
    );

    let url = || {
        store_url.ok_or_else(|| {
            StorageError::Storage(format!("{store_type} session store requires a location"))
        })
    };

    let store: Arc<dyn SessionStore> = match store_type {
        SessionStoreType::Memory => Arc::new(InMemorySessionStore::new()),
        SessionStoreType::Sqlite => Arc::new(SqliteSessionStore::new(url()?)?),
        SessionStoreType::Redis => Arc::new(RedisSessionStore::new(url()?)?),
    };

    if let Err(e) = store.init().await {
        tracing::error!("Failed to initialize {} session store: {}", store_type, e);
        return Err(e);
    }

    tracing::info!("Connected to session store: type={}", store_type);
    Ok(store)
}
