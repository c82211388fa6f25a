use serde::{Deserialize, Serialize};

/// Opaque value held by a session store. Stores never look inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheData {
    pub value: String,
}
