use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::oauth2::{OAuth2Error, OAuthClient, StoredToken, UserInfo};

pub(crate) fn token(access: &str, refresh: Option<&str>) -> StoredToken {
    StoredToken {
        access_token: access.to_string(),
        token_type: "Bearer".to_string(),
        refresh_token: refresh.map(str::to_string),
        expiry: None,
    }
}

pub(crate) fn query_param(url: &str, key: &str) -> Option<String> {
    let url = url::Url::parse(url).ok()?;
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

/// Provider double: known codes map to tokens, everything else is rejected.
#[derive(Default)]
pub(crate) struct MockOAuthClient {
    pub(crate) codes: HashMap<String, StoredToken>,
    pub(crate) refresh_to: Option<StoredToken>,
    pub(crate) refresh_fails: bool,
    pub(crate) userinfo_fails: bool,
    pub(crate) exchange_calls: AtomicUsize,
    pub(crate) userinfo_calls: AtomicUsize,
    pub(crate) last_verifier: Mutex<Option<String>>,
}

impl MockOAuthClient {
    pub(crate) fn with_code(code: &str, token: StoredToken) -> Self {
        Self {
            codes: HashMap::from([(code.to_string(), token)]),
            ..Default::default()
        }
    }
}

#[async_trait]
impl OAuthClient for MockOAuthClient {
    fn authorization_url(&self, state: &str, code_challenge: &str, force_consent: bool) -> String {
        let mut url = format!(
            "https://provider.test/auth?state={}&code_challenge={}&code_challenge_method=S256",
            urlencoding::encode(state),
            urlencoding::encode(code_challenge)
        );
        if force_consent {
            url.push_str("&prompt=consent");
        }
        url
    }

    async fn exchange_code(
        &self,
        code: &str,
        verifier: &str,
    ) -> Result<StoredToken, OAuth2Error> {
        self.exchange_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_verifier.lock().unwrap() = Some(verifier.to_string());
        self.codes
            .get(code)
            .cloned()
            .ok_or_else(|| OAuth2Error::TokenExchange("400 Bad Request: invalid_grant".to_string()))
    }

    async fn token(&self, current: &StoredToken) -> Result<StoredToken, OAuth2Error> {
        if self.refresh_fails {
            return Err(OAuth2Error::TokenRefresh("invalid_grant".to_string()));
        }
        Ok(self.refresh_to.clone().unwrap_or_else(|| current.clone()))
    }

    async fn fetch_userinfo(&self, _token: &StoredToken) -> Result<UserInfo, OAuth2Error> {
        self.userinfo_calls.fetch_add(1, Ordering::SeqCst);
        if self.userinfo_fails {
            return Err(OAuth2Error::FetchUserInfo("503 Service Unavailable".to_string()));
        }
        let value = json!({
            "id": "1234567890",
            "email": "user@example.com",
            "name": "Test User"
        });
        Ok(serde_json::from_value(value).unwrap())
    }
}
