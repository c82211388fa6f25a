use http::header::{COOKIE, HeaderMap, HeaderValue};

use crate::session::errors::SessionError;

/// Name and attributes of the session cookie.
#[derive(Debug, Clone)]
pub(super) struct CookieSettings {
    pub(super) name: String,
    pub(super) secure: bool,
}

impl CookieSettings {
    pub(super) fn set_cookie(&self, value: &str, max_age: i64) -> Result<HeaderValue, SessionError> {
        let secure = if self.secure { "; Secure" } else { "" };
        let cookie = format!(
            "{}={value}; HttpOnly; SameSite=Lax; Path=/; Max-Age={max_age}{secure}",
            self.name
        );
        cookie
            .parse()
            .map_err(|_| SessionError::Cookie("Failed to build Set-Cookie header".to_string()))
    }

    /// Finds the session cookie among the request's `Cookie` headers.
    pub(super) fn session_id_from_headers<'a>(
        &self,
        headers: &'a HeaderMap,
    ) -> Result<Option<&'a str>, SessionError> {
        for cookie_header in headers.get_all(COOKIE) {
            let cookie_str = cookie_header.to_str().map_err(|e| {
                tracing::debug!("Invalid cookie header: {}", e);
                SessionError::HeaderError("Invalid cookie header".to_string())
            })?;

            let session_id = cookie_str.split(';').map(|s| s.trim()).find_map(|s| {
                let mut parts = s.splitn(2, '=');
                match (parts.next(), parts.next()) {
                    (Some(k), Some(v)) if k == self.name && !v.is_empty() => Some(v),
                    _ => None,
                }
            });

            if session_id.is_some() {
                return Ok(session_id);
            }
        }

        tracing::debug!("No session cookie '{}' found in cookies", self.name);
        Ok(None)
    }
}
