use chrono::{Duration, Utc};
use std::sync::atomic::Ordering;

use oauth2_session::{HttpOAuthClient, OAuth2Error, OAuthClient, StoredToken};

use crate::common::MockProvider;

const VERIFIER: &str = "dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk";
const CHALLENGE: &str = "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM";

fn expired(access: &str, refresh: Option<&str>) -> StoredToken {
    StoredToken {
        access_token: access.to_string(),
        token_type: "Bearer".to_string(),
        refresh_token: refresh.map(str::to_string),
        expiry: Some(Utc::now() - Duration::minutes(5)),
    }
}

#[tokio::test]
async fn test_exchange_code_with_pkce() -> Result<(), Box<dyn std::error::Error>> {
    let provider = MockProvider::start().await;
    let client = HttpOAuthClient::new(provider.oauth2_config())?;
    provider.approve("code-1", CHALLENGE);

    let token = client.exchange_code("code-1", VERIFIER).await?;

    assert_eq!(token.access_token, "access-code-1");
    assert_eq!(token.token_type, "Bearer");
    assert_eq!(token.refresh_token.as_deref(), Some("refresh-code-1"));
    assert!(token.expiry.is_some_and(|e| e > Utc::now()));
    assert!(token.has_refresh_token());
    Ok(())
}

#[tokio::test]
async fn test_exchange_code_without_refresh_token() -> Result<(), Box<dyn std::error::Error>> {
    let provider = MockProvider::start().await;
    provider
        .state
        .issue_refresh_token
        .store(false, Ordering::SeqCst);
    let client = HttpOAuthClient::new(provider.oauth2_config())?;
    provider.approve("code-2", CHALLENGE);

    let token = client.exchange_code("code-2", VERIFIER).await?;
    assert!(!token.has_refresh_token());
    Ok(())
}

#[tokio::test]
async fn test_exchange_code_rejects_wrong_verifier() {
    let provider = MockProvider::start().await;
    let client = HttpOAuthClient::new(provider.oauth2_config()).unwrap();
    provider.approve("code-3", CHALLENGE);

    let result = client
        .exchange_code("code-3", "some-other-verifier-that-does-not-match-at-all")
        .await;

    match result {
        Err(OAuth2Error::TokenExchange(msg)) => {
            assert!(msg.contains("400"), "unexpected message: {msg}");
            assert!(msg.contains("invalid_grant"), "unexpected message: {msg}");
        }
        other => panic!("Expected TokenExchange error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_exchange_code_is_single_use() {
    let provider = MockProvider::start().await;
    let client = HttpOAuthClient::new(provider.oauth2_config()).unwrap();
    provider.approve("code-4", CHALLENGE);

    assert!(client.exchange_code("code-4", VERIFIER).await.is_ok());
    assert!(matches!(
        client.exchange_code("code-4", VERIFIER).await,
        Err(OAuth2Error::TokenExchange(_))
    ));
}

#[tokio::test]
async fn test_exchange_with_wrong_client_secret() {
    let provider = MockProvider::start().await;
    let mut config = provider.oauth2_config();
    config.client_secret = "wrong".to_string();
    let client = HttpOAuthClient::new(config).unwrap();
    provider.approve("code-5", CHALLENGE);

    match client.exchange_code("code-5", VERIFIER).await {
        Err(OAuth2Error::TokenExchange(msg)) => assert!(msg.contains("401")),
        other => panic!("Expected TokenExchange error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_token_refreshes_expired_token() -> Result<(), Box<dyn std::error::Error>> {
    let provider = MockProvider::start().await;
    let client = HttpOAuthClient::new(provider.oauth2_config())?;

    let current = expired("access-old", Some("refresh-old"));
    let token = client.token(&current).await?;

    assert_eq!(token.access_token, "refreshed-access");
    // The provider did not send a new refresh token, so the old one is kept
    assert_eq!(token.refresh_token.as_deref(), Some("refresh-old"));
    assert!(!token.is_expired_at(Utc::now()));
    assert_eq!(provider.state.token_requests.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn test_token_keeps_valid_token_without_calling_provider() {
    let provider = MockProvider::start().await;
    let client = HttpOAuthClient::new(provider.oauth2_config()).unwrap();

    let current = StoredToken {
        expiry: Some(Utc::now() + Duration::hours(1)),
        ..expired("access-valid", Some("refresh-valid"))
    };
    let token = client.token(&current).await.unwrap();

    assert_eq!(token, current);
    assert_eq!(provider.state.token_requests.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_token_refresh_rejected() {
    let provider = MockProvider::start().await;
    let client = HttpOAuthClient::new(provider.oauth2_config()).unwrap();

    let result = client.token(&expired("access-old", Some("revoked"))).await;
    assert!(matches!(result, Err(OAuth2Error::TokenRefresh(_))));
}

#[tokio::test]
async fn test_fetch_userinfo() -> Result<(), Box<dyn std::error::Error>> {
    let provider = MockProvider::start().await;
    let client = HttpOAuthClient::new(provider.oauth2_config())?;

    let token = StoredToken {
        expiry: None,
        ..expired("access-code", Some("refresh-code"))
    };
    let userinfo = client.fetch_userinfo(&token).await?;

    assert_eq!(userinfo["email"], "user@example.com");
    assert_eq!(userinfo["verified_email"], true);
    Ok(())
}

#[tokio::test]
async fn test_fetch_userinfo_unauthorized() {
    let provider = MockProvider::start().await;
    let client = HttpOAuthClient::new(provider.oauth2_config()).unwrap();

    match client.fetch_userinfo(&expired("unknown", None)).await {
        Err(OAuth2Error::FetchUserInfo(msg)) => assert!(msg.contains("401")),
        other => panic!("Expected FetchUserInfo error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_userinfo_malformed_payload() {
    let provider = MockProvider::start().await;
    let client = HttpOAuthClient::new(provider.oauth2_config()).unwrap();

    let result = client.fetch_userinfo(&expired("malformed", None)).await;
    assert!(matches!(result, Err(OAuth2Error::Serde(_))));
}

#[tokio::test]
async fn test_unreachable_provider() {
    let provider = MockProvider::start().await;
    let mut config = provider.oauth2_config();
    // Nothing listens on port 9 on the loopback interface
    config.token_url = "http://127.0.0.1:9/oauth2/token".to_string();
    config.userinfo_url = "http://127.0.0.1:9/oauth2/userinfo".to_string();
    let client = HttpOAuthClient::new(config).unwrap();

    assert!(matches!(
        client.exchange_code("code", VERIFIER).await,
        Err(OAuth2Error::TokenExchange(_))
    ));
    assert!(matches!(
        client.fetch_userinfo(&expired("access-x", None)).await,
        Err(OAuth2Error::FetchUserInfo(_))
    ));
}
