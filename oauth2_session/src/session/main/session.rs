use chrono::{DateTime, Duration, Utc};
use http::header::{HeaderMap, HeaderValue};
use std::sync::Arc;

use crate::session::config::SessionConfig;
use crate::session::errors::SessionError;
use crate::session::types::{SessionData, StoredSession};
use crate::storage::{CacheData, SessionStore};
use crate::utils::gen_random_string;

use super::cookie::CookieSettings;

/// Random bytes in a session identifier (43 characters once encoded).
const SESSION_ID_BYTES: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionStatus {
    Unmodified,
    Modified,
    Destroyed,
}

/// A session loaded for the duration of one request.
///
/// Changes stay in memory until [`SessionManager::commit`] writes them back.
#[derive(Debug)]
pub struct Session {
    id: Option<String>,
    data: SessionData,
    expires_at: Option<DateTime<Utc>>,
    status: SessionStatus,
    renew: bool,
    destroyed_id: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            id: None,
            data: SessionData::default(),
            expires_at: None,
            status: SessionStatus::Unmodified,
            renew: false,
            destroyed_id: None,
        }
    }
}

impl Session {
    /// Identifier of the stored record, `None` until the session is first committed.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn data(&self) -> &SessionData {
        &self.data
    }

    /// Mutable access to the data; marks the session for saving.
    pub fn data_mut(&mut self) -> &mut SessionData {
        self.status = SessionStatus::Modified;
        &mut self.data
    }

    pub fn has_token(&self) -> bool {
        self.data.token.is_some()
    }

    /// Reads and clears the consent marker.
    pub fn take_consent_marker(&mut self) -> bool {
        if self.data.get_consent {
            self.data_mut().get_consent = false;
            true
        } else {
            false
        }
    }

    /// Issue a fresh identifier on commit and drop the record under the old one.
    pub fn renew_id(&mut self) {
        self.renew = true;
        self.status = SessionStatus::Modified;
    }

    /// Clear all data. The record is deleted and the cookie expired on commit.
    /// Writing to the session afterwards starts a new one.
    pub fn destroy(&mut self) {
        if let Some(id) = self.id.take() {
            self.destroyed_id = Some(id);
        }
        self.data = SessionData::default();
        self.expires_at = None;
        self.renew = false;
        self.status = SessionStatus::Destroyed;
    }

    pub fn is_destroyed(&self) -> bool {
        self.status == SessionStatus::Destroyed
    }
}

/// What the response must do with the session cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookieDirective {
    Keep,
    Set { token: String, max_age: i64 },
    Expire,
}

/// Loads and commits sessions against a [`SessionStore`].
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    lifetime: Duration,
    cookie: CookieSettings,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>, config: &SessionConfig) -> Self {
        Self {
            store,
            lifetime: i64::try_from(config.lifetime)
                .ok()
                .and_then(Duration::try_seconds)
                .unwrap_or(Duration::MAX),
            cookie: CookieSettings {
                name: config.cookie_name.clone(),
                secure: config.cookie_secure,
            },
        }
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie.name
    }

    /// Extracts the session identifier from the request's cookies.
    pub fn session_id_from_headers<'a>(
        &self,
        headers: &'a HeaderMap,
    ) -> Result<Option<&'a str>, SessionError> {
        self.cookie.session_id_from_headers(headers)
    }

    /// Loads the session for `token`.
    ///
    /// A missing, unknown or expired token yields an empty session. A record
    /// that cannot be decoded yields [`SessionError::Decode`].
    pub async fn load(&self, token: Option<&str>) -> Result<Session, SessionError> {
        let Some(token) = token else {
            return Ok(Session::default());
        };

        let Some(cached) = self.store.get(token).await? else {
            tracing::debug!("No session record for the presented cookie");
            return Ok(Session::default());
        };

        let stored: StoredSession = cached.try_into()?;
        if stored.expires_at <= Utc::now() {
            tracing::debug!("Session expired at {}", stored.expires_at);
            self.store.remove(token).await?;
            return Ok(Session::default());
        }

        Ok(Session {
            id: Some(token.to_string()),
            data: stored.data,
            expires_at: Some(stored.expires_at),
            ..Default::default()
        })
    }

    /// Writes pending changes back to the store.
    pub async fn commit(&self, session: &mut Session) -> Result<CookieDirective, SessionError> {
        if let Some(old) = session.destroyed_id.take() {
            self.store.remove(&old).await?;
            tracing::debug!("Session destroyed");
        }

        match session.status {
            SessionStatus::Unmodified => Ok(CookieDirective::Keep),
            SessionStatus::Destroyed => {
                session.status = SessionStatus::Unmodified;
                Ok(CookieDirective::Expire)
            }
            SessionStatus::Modified => {
                let now = Utc::now();

                if session.renew {
                    if let Some(old) = session.id.take() {
                        self.store.remove(&old).await?;
                    }
                    session.expires_at = None;
                    session.renew = false;
                    tracing::debug!("Session identifier renewed");
                }

                let id = match &session.id {
                    Some(id) => id.clone(),
                    None => {
                        let id = gen_random_string(SESSION_ID_BYTES)?;
                        session.id = Some(id.clone());
                        id
                    }
                };
                let expires_at = match session.expires_at {
                    Some(expires_at) => expires_at,
                    None => {
                        let expires_at = now.checked_add_signed(self.lifetime).ok_or_else(|| {
                            SessionError::Encode("Session lifetime out of range".to_string())
                        })?;
                        session.expires_at = Some(expires_at);
                        expires_at
                    }
                };

                let stored = StoredSession {
                    data: session.data.clone(),
                    expires_at,
                };
                let cache_data = CacheData::try_from(&stored)?;
                self.store.put(&id, cache_data, expires_at).await?;

                session.status = SessionStatus::Unmodified;
                Ok(CookieDirective::Set {
                    token: id,
                    max_age: (expires_at - now).num_seconds().max(0),
                })
            }
        }
    }

    /// Deletes the record for `token` regardless of its contents.
    pub async fn discard(&self, token: &str) -> Result<(), SessionError> {
        self.store.remove(token).await?;
        Ok(())
    }

    /// `Set-Cookie` value for a commit result, if the cookie must change.
    pub fn set_cookie_header(
        &self,
        directive: &CookieDirective,
    ) -> Result<Option<HeaderValue>, SessionError> {
        match directive {
            CookieDirective::Keep => Ok(None),
            CookieDirective::Set { token, max_age } => {
                self.cookie.set_cookie(token, *max_age).map(Some)
            }
            CookieDirective::Expire => self.cookie.set_cookie("", 0).map(Some),
        }
    }
}
