use async_trait::async_trait;
use chrono::Utc;
use std::time::Duration;

use crate::oauth2::config::OAuth2Config;
use crate::oauth2::errors::OAuth2Error;
use crate::oauth2::types::{StoredToken, TokenResponse, UserInfo};

/// The identity provider as seen by the auth flow.
#[async_trait]
pub trait OAuthClient: Send + Sync + 'static {
    /// URL of the provider's consent page for this attempt.
    fn authorization_url(&self, state: &str, code_challenge: &str, force_consent: bool) -> String;

    /// Exchanges an authorization code plus its PKCE verifier for a token.
    async fn exchange_code(&self, code: &str, verifier: &str)
    -> Result<StoredToken, OAuth2Error>;

    /// Returns `current` if it is still valid, otherwise a token obtained with
    /// its refresh token.
    async fn token(&self, current: &StoredToken) -> Result<StoredToken, OAuth2Error>;

    /// Calls the userinfo endpoint with `token` as bearer credential.
    async fn fetch_userinfo(&self, token: &StoredToken) -> Result<UserInfo, OAuth2Error>;
}

/// [`OAuthClient`] talking to a real provider over HTTPS.
pub struct HttpOAuthClient {
    config: OAuth2Config,
    client: reqwest::Client,
}

impl HttpOAuthClient {
    pub fn new(config: OAuth2Config) -> Result<Self, OAuth2Error> {
        Ok(Self {
            config,
            client: get_client()?,
        })
    }

    async fn post_token_form(
        &self,
        form: &[(&str, &str)],
    ) -> Result<TokenResponse, (Option<reqwest::StatusCode>, String)> {
        let response = self
            .client
            .post(self.config.token_url.as_str())
            .form(form)
            .send()
            .await
            .map_err(|e| (None, e.to_string()))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| (None, e.to_string()))?;

        if !status.is_success() {
            tracing::debug!("Token endpoint returned {}: {}", status, body);
            return Err((Some(status), body));
        }

        serde_json::from_str::<TokenResponse>(&body)
            .map_err(|e| (None, format!("Failed to deserialize token response: {e}")))
    }
}

/// Creates a configured HTTP client for provider calls.
///
/// - `timeout`: 30 seconds, provider calls are synchronous to the request
///   being served and must not hang it indefinitely.
/// - `pool_idle_timeout`: 90 seconds.
/// - `pool_max_idle_per_host`: 32.
fn get_client() -> Result<reqwest::Client, OAuth2Error> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .pool_idle_timeout(Duration::from_secs(90))
        .pool_max_idle_per_host(32)
        .build()
        .map_err(|e| OAuth2Error::Client(e.to_string()))
}

fn format_failure(status: Option<reqwest::StatusCode>, detail: String) -> String {
    match status {
        Some(status) => format!("{status}: {detail}"),
        None => detail,
    }
}

#[async_trait]
impl OAuthClient for HttpOAuthClient {
    fn authorization_url(&self, state: &str, code_challenge: &str, force_consent: bool) -> String {
        let scope = self.config.scopes.join(" ");
        let mut params = vec![
            ("client_id", self.config.client_id.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("response_type", "code"),
            ("scope", scope.as_str()),
            ("state", state),
            // Offline access is what makes the provider issue a refresh token.
            ("access_type", "offline"),
            ("code_challenge", code_challenge),
            ("code_challenge_method", "S256"),
        ];
        if force_consent {
            params.push(("prompt", "consent"));
        }

        let query = params
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        let separator = if self.config.auth_url.contains('?') {
            '&'
        } else {
            '?'
        };

        let auth_url = format!("{}{separator}{query}", self.config.auth_url);
        tracing::debug!("Auth URL: {}", auth_url);
        auth_url
    }

    async fn exchange_code(
        &self,
        code: &str,
        verifier: &str,
    ) -> Result<StoredToken, OAuth2Error> {
        let response = self
            .post_token_form(&[
                ("code", code),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
                ("code_verifier", verifier),
            ])
            .await
            .map_err(|(status, detail)| {
                OAuth2Error::TokenExchange(format_failure(status, detail))
            })?;

        Ok(StoredToken::from_response(response, Utc::now()))
    }

    async fn token(&self, current: &StoredToken) -> Result<StoredToken, OAuth2Error> {
        let now = Utc::now();
        if !current.is_expired_at(now) {
            return Ok(current.clone());
        }

        let Some(refresh_token) = current.refresh_token.as_deref().filter(|t| !t.is_empty())
        else {
            return Err(OAuth2Error::RefreshTokenMissing);
        };

        tracing::debug!("Access token expired at {:?}, refreshing", current.expiry);
        let response = self
            .post_token_form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .await
            .map_err(|(status, detail)| OAuth2Error::TokenRefresh(format_failure(status, detail)))?;

        Ok(current.refreshed(response, Utc::now()))
    }

    async fn fetch_userinfo(&self, token: &StoredToken) -> Result<UserInfo, OAuth2Error> {
        let response = self
            .client
            .get(self.config.userinfo_url.as_str())
            .bearer_auth(&token.access_token)
            .send()
            .await
            .map_err(|e| OAuth2Error::FetchUserInfo(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| OAuth2Error::FetchUserInfo(e.to_string()))?;

        if !status.is_success() {
            return Err(OAuth2Error::FetchUserInfo(format!("{status}: {body}")));
        }

        tracing::debug!("Userinfo response body: {}", body);
        serde_json::from_str::<UserInfo>(&body)
            .map_err(|e| OAuth2Error::Serde(format!("Failed to deserialize response body: {e}")))
    }
}
