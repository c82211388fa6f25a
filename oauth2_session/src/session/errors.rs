use thiserror::Error;

use crate::storage::StorageError;
use crate::utils::UtilError;

#[derive(Debug, Error, Clone)]
pub enum SessionError {
    #[error("Storage error: {0}")]
    Storage(String),

    /// The stored record exists but does not deserialize into the session schema.
    #[error("Session decode error: {0}")]
    Decode(String),

    #[error("Session encode error: {0}")]
    Encode(String),

    #[error("Cookie error: {0}")]
    Cookie(String),

    #[error("Header error: {0}")]
    HeaderError(String),

    /// Error from utils operations
    #[error("Utils error: {0}")]
    Utils(#[from] UtilError),
}

impl From<StorageError> for SessionError {
    fn from(err: StorageError) -> Self {
        match err {
            // The store could read the record but not parse it
            StorageError::Serde(msg) => Self::Decode(msg),
            other => Self::Storage(other.to_string()),
        }
    }
}
