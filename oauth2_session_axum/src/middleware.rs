use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::pages;
use crate::session::SessionHandle;

/// Lets the request through only if the session holds a token.
///
/// Token validity is not checked here; an expired token is refreshed by the
/// protected handler.
pub async fn require_token(session: SessionHandle, req: Request, next: Next) -> Response {
    let has_token = session.lock().await.has_token();
    if !has_token {
        tracing::debug!("No token in session, rejecting {}", req.uri());
        return match pages::unauthorized_page() {
            Ok(response) => response,
            Err(e) => e.into_response(),
        };
    }

    next.run(req).await
}
