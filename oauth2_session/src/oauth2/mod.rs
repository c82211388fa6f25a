mod config;
mod errors;
mod main;
mod types;

pub use config::OAuth2Config;
pub use errors::OAuth2Error;
pub use main::{HttpOAuthClient, OAuthClient};
pub use types::{AuthResponse, StoredToken, UserInfo};

pub(crate) use main::{generate_state, generate_verifier, s256_challenge};
