//! Test utilities shared by the router and middleware tests

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{
        Request, Response,
        header::{COOKIE, LOCATION, SET_COOKIE},
    },
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use oauth2_session::{
    Config, InMemorySessionStore, OAuth2Error, OAuthClient, StoredToken, UserInfo,
};

use crate::config::AppContext;
use crate::router::app_router_no_trace;

pub(crate) const CALLBACK_PATH: &str = "/auth/google/callback";

pub(crate) fn token(access: &str, refresh: Option<&str>) -> StoredToken {
    StoredToken {
        access_token: access.to_string(),
        token_type: "Bearer".to_string(),
        refresh_token: refresh.map(str::to_string),
        expiry: None,
    }
}

/// Provider double: known codes map to tokens, everything else is rejected.
#[derive(Default)]
pub(crate) struct MockOAuthClient {
    pub(crate) codes: Mutex<HashMap<String, StoredToken>>,
    pub(crate) refresh_to: Mutex<Option<StoredToken>>,
    pub(crate) userinfo_fails: AtomicBool,
    pub(crate) exchange_calls: AtomicUsize,
}

impl MockOAuthClient {
    pub(crate) fn approve(&self, code: &str, token: StoredToken) {
        self.codes.lock().unwrap().insert(code.to_string(), token);
    }
}

#[async_trait]
impl OAuthClient for MockOAuthClient {
    fn authorization_url(&self, state: &str, code_challenge: &str, force_consent: bool) -> String {
        let mut url = format!(
            "https://provider.test/auth?state={}&code_challenge={}&code_challenge_method=S256&access_type=offline",
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
        _verifier: &str,
    ) -> Result<StoredToken, OAuth2Error> {
        self.exchange_calls.fetch_add(1, Ordering::SeqCst);
        self.codes
            .lock()
            .unwrap()
            .remove(code)
            .ok_or_else(|| OAuth2Error::TokenExchange("invalid_grant".to_string()))
    }

    async fn token(&self, current: &StoredToken) -> Result<StoredToken, OAuth2Error> {
        Ok(self
            .refresh_to
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| current.clone()))
    }

    async fn fetch_userinfo(&self, _token: &StoredToken) -> Result<UserInfo, OAuth2Error> {
        if self.userinfo_fails.load(Ordering::SeqCst) {
            return Err(OAuth2Error::FetchUserInfo("503".to_string()));
        }
        Ok(serde_json::from_value(json!({
            "id": "1234567890",
            "email": "user@example.com",
            "name": "Test User"
        }))
        .unwrap())
    }
}

pub(crate) struct TestApp {
    pub(crate) ctx: AppContext,
    pub(crate) oauth: Arc<MockOAuthClient>,
    pub(crate) router: Router,
}

pub(crate) fn test_config() -> Config {
    Config::from_lookup(|key| {
        let value = match key {
            "GOOGLE_CLIENT_ID" => "client-id",
            "GOOGLE_CLIENT_SECRET" => "client-secret",
            "GOOGLE_REDIRECT_URI" => "http://localhost:3000/auth/google/callback",
            "SESSION_STORE_TYPE" => "memory",
            _ => return None,
        };
        Some(value.to_string())
    })
    .unwrap()
}

impl TestApp {
    pub(crate) fn new() -> Self {
        let oauth = Arc::new(MockOAuthClient::default());
        let ctx = AppContext::new(
            test_config(),
            Arc::new(InMemorySessionStore::new()),
            oauth.clone(),
        );
        let router = app_router_no_trace(ctx.clone());
        Self { ctx, oauth, router }
    }

    pub(crate) async fn request(
        &self,
        method: &str,
        uri: &str,
        cookie: Option<&str>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        self.router
            .clone()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }
}

/// `name=value` of the session cookie set by the response, if any.
pub(crate) fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("session="))
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

pub(crate) fn set_cookie_header(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

pub(crate) fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

pub(crate) fn query_param(url: &str, key: &str) -> Option<String> {
    let url = url::Url::parse(url).ok()?;
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

pub(crate) async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
