use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::SET_COOKIE, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use oauth2_session::{CookieDirective, FlowError, Session};

use crate::config::AppContext;
use crate::error::AppError;

/// The request's session, available as an Axum extractor
///
/// Inserted by [`session_layer`]. Handlers lock it to read or modify the
/// session; the layer commits it once the handler has returned.
#[derive(Clone)]
pub struct SessionHandle(Arc<Mutex<Session>>);

impl SessionHandle {
    pub async fn lock(&self) -> MutexGuard<'_, Session> {
        self.0.lock().await
    }
}

impl<S> FromRequestParts<S> for SessionHandle
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionHandle>()
            .cloned()
            .ok_or(AppError::MissingSession)
    }
}

/// Loads the session before the handler runs and commits it afterwards.
pub async fn session_layer(
    State(ctx): State<AppContext>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = match ctx.sessions.session_id_from_headers(req.headers()) {
        Ok(token) => token.map(str::to_string),
        Err(e) => return AppError::from(e).into_response(),
    };

    let session = match ctx.sessions.load(token.as_deref()).await {
        Ok(session) => session,
        Err(e) => {
            let err = FlowError::from(e);
            let Some(token) = token.filter(|_| matches!(err, FlowError::TokenDecode(_))) else {
                return AppError::from(err).into_response();
            };

            // An undecodable record can never be used again: drop it and the cookie.
            if let Err(e) = ctx.sessions.discard(&token).await {
                tracing::error!("Failed to discard undecodable session: {}", e);
            }
            let mut response = AppError::from(err).into_response();
            append_cookie(&ctx, &mut response, &CookieDirective::Expire);
            return response;
        }
    };

    let handle = SessionHandle(Arc::new(Mutex::new(session)));
    req.extensions_mut().insert(handle.clone());

    let mut response = next.run(req).await;

    let directive = {
        let mut session = handle.lock().await;
        ctx.sessions.commit(&mut session).await
    };
    match directive {
        Ok(directive) => {
            append_cookie(&ctx, &mut response, &directive);
            response
        }
        Err(e) => AppError::from(e).into_response(),
    }
}

fn append_cookie(ctx: &AppContext, response: &mut Response, directive: &CookieDirective) {
    match ctx.sessions.set_cookie_header(directive) {
        Ok(Some(value)) => {
            response.headers_mut().append(SET_COOKIE, value);
        }
        Ok(None) => {}
        Err(e) => tracing::error!("Failed to build session cookie: {}", e),
    }
}
