mod client;
mod pkce;

pub use client::{HttpOAuthClient, OAuthClient};

pub(crate) use pkce::{generate_state, generate_verifier, s256_challenge};
