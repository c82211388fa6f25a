use crate::config::{ConfigError, parse_bool};
use crate::storage::SessionStoreType;

const DEFAULT_COOKIE_NAME: &str = "session";
const DEFAULT_LIFETIME: u64 = 24 * 60 * 60;
/// Browsers cap cookie `Max-Age` at 400 days.
const MAX_LIFETIME: u64 = 400 * 24 * 60 * 60;

/// Session store selection and cookie policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub store_type: SessionStoreType,
    /// `DATABASE`: sqlite path/URL or redis URL. Unused by the memory store.
    pub store_url: Option<String>,
    /// Absolute session lifetime in seconds.
    pub lifetime: u64,
    pub cookie_name: String,
    pub cookie_secure: bool,
}

/// In-memory store with the default cookie policy.
impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            store_type: SessionStoreType::Memory,
            store_url: None,
            lifetime: DEFAULT_LIFETIME,
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            cookie_secure: true,
        }
    }
}

impl SessionConfig {
    pub(crate) fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store_type = match lookup("SESSION_STORE_TYPE") {
            Some(v) => v
                .parse::<SessionStoreType>()
                .map_err(|e| ConfigError::Invalid {
                    key: "SESSION_STORE_TYPE",
                    reason: e.to_string(),
                })?,
            None => SessionStoreType::default(),
        };

        let store_url = lookup("DATABASE").filter(|v| !v.trim().is_empty());
        if store_type.requires_url() && store_url.is_none() {
            return Err(ConfigError::Missing("DATABASE"));
        }

        let lifetime = match lookup("SESSION_LIFETIME") {
            Some(v) => match v.parse::<u64>() {
                Ok(0) => {
                    return Err(ConfigError::Invalid {
                        key: "SESSION_LIFETIME",
                        reason: "must be greater than zero".to_string(),
                    });
                }
                Ok(n) if n > MAX_LIFETIME => {
                    return Err(ConfigError::Invalid {
                        key: "SESSION_LIFETIME",
                        reason: format!("must not exceed {MAX_LIFETIME} seconds"),
                    });
                }
                Ok(n) => n,
                Err(e) => {
                    return Err(ConfigError::Invalid {
                        key: "SESSION_LIFETIME",
                        reason: e.to_string(),
                    });
                }
            },
            None => DEFAULT_LIFETIME,
        };

        let cookie_secure = match lookup("SESSION_COOKIE_SECURE") {
            Some(v) => parse_bool("SESSION_COOKIE_SECURE", &v)?,
            None => true,
        };

        Ok(Self {
            store_type,
            store_url,
            lifetime,
            cookie_name: lookup("SESSION_COOKIE_NAME")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_COOKIE_NAME.to_string()),
            cookie_secure,
        })
    }
}
