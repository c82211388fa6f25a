mod errors;
mod session_store;
mod types;

pub use errors::StorageError;
pub use session_store::{
    InMemorySessionStore, RedisSessionStore, SessionStore, SessionStoreType, SqliteSessionStore,
    create_session_store,
};
pub use types::CacheData;
