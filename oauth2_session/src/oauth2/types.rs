use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Tokens are treated as expired this long before their actual expiry so that
/// a token is never sent just as it lapses.
const EXPIRY_DELTA_SECONDS: i64 = 10;

/// Payload returned by the userinfo endpoint, kept as an ordered JSON object.
pub type UserInfo = BTreeMap<String, Value>;

/// Credential obtained from the provider and kept in the session.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct StoredToken {
    pub access_token: String,
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

impl StoredToken {
    pub(crate) fn from_response(response: TokenResponse, now: DateTime<Utc>) -> Self {
        Self {
            access_token: response.access_token,
            token_type: response.token_type.unwrap_or_else(|| "Bearer".to_string()),
            refresh_token: response.refresh_token.filter(|t| !t.is_empty()),
            expiry: response
                .expires_in
                .filter(|secs| *secs > 0)
                .and_then(|secs| i64::try_from(secs).ok())
                .and_then(Duration::try_seconds)
                .and_then(|lifetime| now.checked_add_signed(lifetime)),
        }
    }

    /// Builds the successor of `self` from a refresh-grant response. Providers
    /// usually omit the refresh token on refresh, in which case the current one
    /// is carried over.
    pub(crate) fn refreshed(&self, response: TokenResponse, now: DateTime<Utc>) -> Self {
        let mut token = Self::from_response(response, now);
        if token.refresh_token.is_none() {
            token.refresh_token = self.refresh_token.clone();
        }
        token
    }

    pub fn has_refresh_token(&self) -> bool {
        self.refresh_token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// A token without an expiry never expires.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expiry {
            Some(expiry) => expiry
                .checked_sub_signed(Duration::seconds(EXPIRY_DELTA_SECONDS))
                .is_none_or(|deadline| deadline <= now),
            None => false,
        }
    }
}

/// Token endpoint response for both the authorization-code and refresh grants.
#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct TokenResponse {
    pub(crate) access_token: String,
    #[serde(default)]
    pub(crate) token_type: Option<String>,
    #[serde(default)]
    pub(crate) expires_in: Option<u64>,
    #[serde(default)]
    pub(crate) refresh_token: Option<String>,
    #[serde(default)]
    pub(crate) scope: Option<String>,
    #[serde(default)]
    pub(crate) id_token: Option<String>,
}

/// Query parameters the provider appends to the redirect URI.
#[derive(Debug, Default, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}
