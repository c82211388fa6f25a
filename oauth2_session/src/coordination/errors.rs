use thiserror::Error;

use crate::oauth2::OAuth2Error;
use crate::session::SessionError;
use crate::utils::UtilError;

/// Errors of the login flow and protected resource access.
#[derive(Error, Debug)]
pub enum FlowError {
    /// The callback's `state` did not match the stored one, or none was stored
    #[error("State mismatch")]
    StateMismatch,

    /// The provider refused the authorization code or the refresh token
    #[error("Token exchange failed: {0}")]
    ExchangeFailed(OAuth2Error),

    /// The session record exists but could not be decoded
    #[error("Token decode error: {0}")]
    TokenDecode(String),

    /// The userinfo call failed
    #[error("Downstream call failed: {0}")]
    DownstreamCallFailed(OAuth2Error),

    /// The session holds no token
    #[error("Unauthorized access")]
    Unauthorized,

    /// Error from Session operations
    #[error("Session error: {0}")]
    Session(SessionError),

    /// Error from utils operations
    #[error("Utils error: {0}")]
    Utils(UtilError),
}

impl From<SessionError> for FlowError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Decode(msg) => Self::TokenDecode(msg),
            other => Self::Session(other),
        }
    }
}

impl From<UtilError> for FlowError {
    fn from(err: UtilError) -> Self {
        Self::Utils(err)
    }
}
