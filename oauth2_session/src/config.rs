//! Application configuration sourced from the environment.
//!
//! Everything is parsed once into a [`Config`] value which is then handed to
//! the components that need it. Nothing in this crate reads the environment
//! after start-up.

use thiserror::Error;

use crate::oauth2::OAuth2Config;
use crate::session::SessionConfig;

const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Paths to a PEM certificate chain and private key for serving HTTPS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsConfig {
    pub cert_path: String,
    pub key_path: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub oauth2: OAuth2Config,
    pub session: SessionConfig,
    pub tls: Option<TlsConfig>,
}

impl Config {
    /// Builds the configuration from process environment variables.
    ///
    /// Call `dotenvy::dotenv()` beforehand if a `.env` file should be honoured.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(v) => v.parse::<u16>().map_err(|e| ConfigError::Invalid {
                key: "PORT",
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let tls = match (lookup("TLS_CERT_PATH"), lookup("TLS_KEY_PATH")) {
            (Some(cert_path), Some(key_path)) => Some(TlsConfig {
                cert_path,
                key_path,
            }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing("TLS_KEY_PATH")),
            (None, Some(_)) => return Err(ConfigError::Missing("TLS_CERT_PATH")),
        };

        Ok(Self {
            port,
            oauth2: OAuth2Config::from_lookup(&lookup)?,
            session: SessionConfig::from_lookup(&lookup)?,
            tls,
        })
    }
}

pub(crate) fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(key))
}

pub(crate) fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::Invalid {
            key,
            reason: format!("'{other}' is not a boolean"),
        }),
    }
}
