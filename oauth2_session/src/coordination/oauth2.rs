use subtle::ConstantTimeEq;

use crate::oauth2::{
    AuthResponse, OAuth2Error, OAuthClient, StoredToken, UserInfo, generate_state,
    generate_verifier, s256_challenge,
};
use crate::session::Session;

use super::errors::FlowError;

pub const HOME_PATH: &str = "/";
pub const PROTECTED_PATH: &str = "/protected";
pub const LOGIN_RENEW_PATH: &str = "/login-renew";

/// Where the browser is sent after a flow step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowRedirect {
    /// The provider's authorization endpoint
    Provider(String),
    Protected,
    LoginRenew,
    Home,
}

impl FlowRedirect {
    pub fn location(&self) -> &str {
        match self {
            Self::Provider(url) => url,
            Self::Protected => PROTECTED_PATH,
            Self::LoginRenew => LOGIN_RENEW_PATH,
            Self::Home => HOME_PATH,
        }
    }
}

/// Data shown on the protected page.
#[derive(Debug, Clone)]
pub struct ProtectedResource {
    pub userinfo: UserInfo,
    pub token: StoredToken,
}

/// Starts an authorization-code + PKCE login.
///
/// A session that already holds a token goes straight to the protected page.
pub fn initiate_login(
    session: &mut Session,
    oauth: &dyn OAuthClient,
) -> Result<FlowRedirect, FlowError> {
    if session.has_token() {
        tracing::debug!("Session already holds a token, skipping login");
        return Ok(FlowRedirect::Protected);
    }

    let state = generate_state()?;
    let verifier = generate_verifier()?;
    let force_consent = session.take_consent_marker();

    let auth_url = oauth.authorization_url(&state, &s256_challenge(&verifier), force_consent);

    let data = session.data_mut();
    data.state = Some(state);
    data.verifier = Some(verifier);

    tracing::debug!("Login initiated, force_consent: {}", force_consent);
    Ok(FlowRedirect::Provider(auth_url))
}

/// Completes the login when the provider redirects back.
///
/// The stored state and verifier are consumed before anything else so that a
/// callback can be processed at most once per login attempt.
pub async fn handle_callback(
    session: &mut Session,
    oauth: &dyn OAuthClient,
    auth_response: &AuthResponse,
) -> Result<FlowRedirect, FlowError> {
    let (stored_state, verifier) = {
        let data = session.data_mut();
        (data.state.take(), data.verifier.take())
    };

    let (Some(stored_state), Some(verifier)) = (stored_state, verifier) else {
        tracing::debug!("No pending authorization request in session");
        return Err(FlowError::StateMismatch);
    };

    if !bool::from(
        stored_state
            .as_bytes()
            .ct_eq(auth_response.state.as_bytes()),
    ) {
        tracing::debug!("State in callback does not match the stored state");
        return Err(FlowError::StateMismatch);
    }

    if let Some(error) = &auth_response.error {
        return Err(FlowError::ExchangeFailed(OAuth2Error::AuthorizationDenied(
            error.clone(),
        )));
    }

    let Some(code) = auth_response.code.as_deref().filter(|c| !c.is_empty()) else {
        return Err(FlowError::ExchangeFailed(OAuth2Error::MissingCode));
    };

    let token = oauth
        .exchange_code(code, &verifier)
        .await
        .map_err(FlowError::ExchangeFailed)?;

    if !token.has_refresh_token() {
        // Refresh tokens are only issued on the consent screen, so the next
        // attempt has to force it.
        tracing::info!("No refresh token in exchange response, consent required");
        session.data_mut().get_consent = true;
        return Ok(FlowRedirect::LoginRenew);
    }

    session.data_mut().token = Some(token);
    session.renew_id();

    tracing::info!("Login completed");
    Ok(FlowRedirect::Protected)
}

/// `GET /login-renew`: retries the login with forced consent if the previous
/// exchange left the consent marker, otherwise goes home.
pub fn renew_login(
    session: &mut Session,
    oauth: &dyn OAuthClient,
) -> Result<FlowRedirect, FlowError> {
    if !session.data().get_consent {
        return Ok(FlowRedirect::Home);
    }
    initiate_login(session, oauth)
}

pub fn logout(session: &mut Session) -> FlowRedirect {
    session.destroy();
    FlowRedirect::Home
}

/// Refreshes the stored token if needed and fetches the user's profile.
pub async fn access_protected_resource(
    session: &mut Session,
    oauth: &dyn OAuthClient,
) -> Result<ProtectedResource, FlowError> {
    let Some(current) = session.data().token.clone() else {
        return Err(FlowError::Unauthorized);
    };

    let token = oauth
        .token(&current)
        .await
        .map_err(FlowError::ExchangeFailed)?;

    if token.access_token != current.access_token {
        tracing::debug!("Access token was refreshed, updating session");
        session.data_mut().token = Some(token.clone());
    }

    let userinfo = oauth
        .fetch_userinfo(&token)
        .await
        .map_err(FlowError::DownstreamCallFailed)?;

    Ok(ProtectedResource { userinfo, token })
}
