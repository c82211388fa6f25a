use url::Url;

use crate::config::{ConfigError, required};
use crate::coordination::{HOME_PATH, LOGIN_RENEW_PATH, PROTECTED_PATH};

pub(crate) const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/auth";
pub(crate) const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub(crate) const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

/// Paths served by the application itself; the callback cannot share them.
const RESERVED_PATHS: [&str; 6] = [
    HOME_PATH,
    "/about",
    "/login",
    "/logout",
    LOGIN_RENEW_PATH,
    PROTECTED_PATH,
];

// https://developers.google.com/identity/protocols/oauth2/scopes
const DEFAULT_SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/userinfo.email",
    "https://www.googleapis.com/auth/userinfo.profile",
];

/// Client registration and provider endpoints.
///
/// Endpoints default to Google's and can each be overridden with
/// `OAUTH2_AUTH_URL`, `OAUTH2_TOKEN_URL` and `OAUTH2_USERINFO_URL`.
#[derive(Clone)]
pub struct OAuth2Config {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: Url,
    pub auth_url: String,
    pub token_url: String,
    pub userinfo_url: String,
    pub scopes: Vec<String>,
}

impl std::fmt::Debug for OAuth2Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuth2Config")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .field("redirect_uri", &self.redirect_uri.as_str())
            .field("auth_url", &self.auth_url)
            .field("token_url", &self.token_url)
            .field("userinfo_url", &self.userinfo_url)
            .field("scopes", &self.scopes)
            .finish()
    }
}

impl OAuth2Config {
    pub(crate) fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let redirect_uri = required(lookup, "GOOGLE_REDIRECT_URI")?;
        let redirect_uri = Url::parse(&redirect_uri).map_err(|e| ConfigError::Invalid {
            key: "GOOGLE_REDIRECT_URI",
            reason: e.to_string(),
        })?;
        if RESERVED_PATHS.contains(&redirect_uri.path()) {
            return Err(ConfigError::Invalid {
                key: "GOOGLE_REDIRECT_URI",
                reason: format!(
                    "path '{}' is already used by the application",
                    redirect_uri.path()
                ),
            });
        }

        let scopes = match lookup("OAUTH2_SCOPE") {
            Some(s) => s.split_whitespace().map(str::to_string).collect(),
            None => DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
        };

        Ok(Self {
            client_id: required(lookup, "GOOGLE_CLIENT_ID")?,
            client_secret: required(lookup, "GOOGLE_CLIENT_SECRET")?,
            redirect_uri,
            auth_url: lookup("OAUTH2_AUTH_URL").unwrap_or_else(|| GOOGLE_AUTH_URL.to_string()),
            token_url: lookup("OAUTH2_TOKEN_URL").unwrap_or_else(|| GOOGLE_TOKEN_URL.to_string()),
            userinfo_url: lookup("OAUTH2_USERINFO_URL")
                .unwrap_or_else(|| GOOGLE_USERINFO_URL.to_string()),
            scopes,
        })
    }

    /// Path component of the redirect URI; the callback route is mounted here.
    pub fn callback_path(&self) -> &str {
        self.redirect_uri.path()
    }
}
