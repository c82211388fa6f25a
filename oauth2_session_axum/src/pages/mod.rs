//! HTML pages rendered with askama
//!
//! Templates are rendered into a `String` before any response is built, so a
//! failing template never produces a partially written page.

mod handlers;
mod templates;

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use chrono::Utc;

use oauth2_session::ProtectedResource;

use crate::error::AppError;
use templates::{ProtectedTemplate, ServerErrorTemplate, UnauthorizedTemplate};

pub(crate) use handlers::{about, home, not_found};

/// Values every page receives.
#[derive(Debug, Clone)]
pub(crate) struct PageContext {
    pub(crate) logged_in: bool,
    pub(crate) server_time: String,
}

impl PageContext {
    pub(crate) fn new(logged_in: bool) -> Self {
        Self {
            logged_in,
            server_time: Utc::now().to_rfc2822(),
        }
    }
}

pub(crate) fn render<T: Template>(status: StatusCode, template: T) -> Result<Response, AppError> {
    let html = template.render()?;
    Ok((status, Html(html)).into_response())
}

pub(crate) fn unauthorized_page() -> Result<Response, AppError> {
    let ctx = PageContext::new(false);
    render(
        StatusCode::UNAUTHORIZED,
        UnauthorizedTemplate {
            logged_in: ctx.logged_in,
            server_time: ctx.server_time,
        },
    )
}

/// The generic 500 page, falling back to plain text if it cannot be rendered.
pub(crate) fn server_error_page() -> Response {
    let ctx = PageContext::new(false);
    let template = ServerErrorTemplate {
        logged_in: ctx.logged_in,
        server_time: ctx.server_time,
    };
    match template.render() {
        Ok(html) => (StatusCode::INTERNAL_SERVER_ERROR, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Failed to render the 500 page: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

pub(crate) fn protected_page(resource: ProtectedResource) -> Result<Response, AppError> {
    let ctx = PageContext::new(true);
    let userinfo = resource
        .userinfo
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            (key, value)
        })
        .collect();

    render(
        StatusCode::OK,
        ProtectedTemplate {
            logged_in: ctx.logged_in,
            server_time: ctx.server_time,
            userinfo,
            token_type: resource.token.token_type.clone(),
            expiry: resource
                .token
                .expiry
                .map(|e| e.to_rfc3339())
                .unwrap_or_else(|| "never".to_string()),
            has_refresh_token: resource.token.has_refresh_token(),
        },
    )
}
