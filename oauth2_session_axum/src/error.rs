use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::backtrace::Backtrace;
use std::sync::Arc;
use thiserror::Error;

use oauth2_session::{FlowError, SessionError};

use crate::pages;

/// Errors a handler or middleware can end a request with.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Flow(#[from] FlowError),

    #[error("Template render error: {0}")]
    TemplateRender(#[from] askama::Error),

    #[error("Session missing from request extensions")]
    MissingSession,
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        Self::Flow(FlowError::from(err))
    }
}

/// Attached to error responses so [`report_errors`] can log them with the request.
#[derive(Clone, Debug)]
pub(crate) struct ErrorReport {
    pub(crate) message: String,
    pub(crate) backtrace: Arc<Backtrace>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut response = match &self {
            Self::Flow(FlowError::Unauthorized) => {
                pages::unauthorized_page().unwrap_or_else(|_| pages::server_error_page())
            }
            _ => pages::server_error_page(),
        };

        response.extensions_mut().insert(ErrorReport {
            message: self.to_string(),
            backtrace: Arc::new(Backtrace::force_capture()),
        });
        response
    }
}

/// Logs every error response with the request's method and URL.
pub async fn report_errors(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();

    let response = next.run(req).await;

    if let Some(report) = response.extensions().get::<ErrorReport>() {
        tracing::error!(
            "{}: {}: {}: {}",
            report.message,
            method,
            uri,
            report.backtrace
        );
    } else if response.status() == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!("Internal server error: {}: {}", method, uri);
    }

    response
}
