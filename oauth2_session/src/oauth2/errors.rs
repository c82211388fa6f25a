use thiserror::Error;

use crate::utils::UtilError;

#[derive(Debug, Error, Clone)]
pub enum OAuth2Error {
    #[error("Invalid authorization URL: {0}")]
    AuthUrl(String),

    #[error("Authorization denied by provider: {0}")]
    AuthorizationDenied(String),

    #[error("Authorization code missing from callback")]
    MissingCode,

    #[error("Token exchange error: {0}")]
    TokenExchange(String),

    #[error("Token refresh error: {0}")]
    TokenRefresh(String),

    #[error("Token expired and no refresh token is available")]
    RefreshTokenMissing,

    #[error("Fetch user info error: {0}")]
    FetchUserInfo(String),

    #[error("Serde error: {0}")]
    Serde(String),

    #[error("Http client error: {0}")]
    Client(String),

    /// Error from utils operations
    #[error("Utils error: {0}")]
    Utils(#[from] UtilError),
}
