//! oauth2_session - OAuth2 authorization-code + PKCE login backed by server-side sessions
//!
//! This crate holds the framework-independent parts: configuration, session
//! stores and the session manager, the OAuth client, and the login flow that
//! ties them together. See `oauth2_session_axum` for the web layer.

mod config;
mod coordination;
mod oauth2;
mod session;
mod storage;
mod utils;

pub use config::{Config, ConfigError, TlsConfig};

pub use coordination::{
    FlowError, FlowRedirect, HOME_PATH, LOGIN_RENEW_PATH, PROTECTED_PATH, ProtectedResource,
    access_protected_resource, handle_callback, initiate_login, logout, renew_login,
};

pub use oauth2::{
    AuthResponse, HttpOAuthClient, OAuth2Config, OAuth2Error, OAuthClient, StoredToken, UserInfo,
};

pub use session::{
    AuthState, CookieDirective, Session, SessionConfig, SessionData, SessionError, SessionManager,
};

pub use storage::{
    CacheData, InMemorySessionStore, RedisSessionStore, SessionStore, SessionStoreType,
    SqliteSessionStore, StorageError, create_session_store,
};

pub use utils::UtilError;
