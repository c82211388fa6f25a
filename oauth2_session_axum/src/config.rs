//! Application context shared by all handlers

use std::sync::Arc;

use oauth2_session::{
    Config, HttpOAuthClient, OAuthClient, SessionManager, SessionStore, create_session_store,
};

/// Everything a request needs, passed as axum state.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub sessions: SessionManager,
    pub oauth: Arc<dyn OAuthClient>,
}

impl AppContext {
    pub fn new(config: Config, store: Arc<dyn SessionStore>, oauth: Arc<dyn OAuthClient>) -> Self {
        let sessions = SessionManager::new(store, &config.session);
        Self {
            config: Arc::new(config),
            sessions,
            oauth,
        }
    }

    /// Builds the configured session store and the HTTP OAuth client.
    pub async fn from_config(config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        let store = create_session_store(
            config.session.store_type,
            config.session.store_url.as_deref(),
        )
        .await?;
        let oauth = Arc::new(HttpOAuthClient::new(config.oauth2.clone())?);

        tracing::info!(
            "Application context ready: session store={}, callback path={}",
            config.session.store_type,
            config.oauth2.callback_path()
        );

        Ok(Self::new(config, store, oauth))
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        self.sessions.store()
    }
}
