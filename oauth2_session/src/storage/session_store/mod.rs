mod config;
mod memory;
mod redis;
mod sqlite;
mod types;

pub use config::{SessionStoreType, create_session_store};
pub use types::{InMemorySessionStore, RedisSessionStore, SessionStore, SqliteSessionStore};
