use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::oauth2::StoredToken;
use crate::session::errors::SessionError;
use crate::storage::CacheData;

/// Everything the application keeps in a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    /// Anti-CSRF nonce sent as `state` with the pending authorization request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// PKCE code verifier of the pending authorization request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<StoredToken>,
    /// Set when an exchange yielded no refresh token. Read-and-cleared by the
    /// next login attempt, which then forces the consent screen.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub get_consent: bool,
}

/// Where a session stands in the login flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    PendingCallback,
    Authenticated,
    NeedsConsent,
}

impl SessionData {
    pub fn auth_state(&self) -> AuthState {
        if self.token.is_some() {
            AuthState::Authenticated
        } else if self.get_consent {
            AuthState::NeedsConsent
        } else if self.state.is_some() {
            AuthState::PendingCallback
        } else {
            AuthState::Anonymous
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(super) struct StoredSession {
    pub(super) data: SessionData,
    pub(super) expires_at: DateTime<Utc>,
}

impl TryFrom<&StoredSession> for CacheData {
    type Error = SessionError;

    fn try_from(data: &StoredSession) -> Result<Self, Self::Error> {
        Ok(Self {
            value: serde_json::to_string(data).map_err(|e| SessionError::Encode(e.to_string()))?,
        })
    }
}

impl TryFrom<CacheData> for StoredSession {
    type Error = SessionError;

    fn try_from(data: CacheData) -> Result<Self, Self::Error> {
        serde_json::from_str(&data.value).map_err(|e| SessionError::Decode(e.to_string()))
    }
}
