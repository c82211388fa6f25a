use axum::{http::StatusCode, response::Response};

use crate::error::AppError;
use crate::session::SessionHandle;

use super::templates::{AboutTemplate, HomeTemplate, NotFoundTemplate};
use super::{PageContext, render};

async fn page_context(session: &SessionHandle) -> PageContext {
    PageContext::new(session.lock().await.has_token())
}

pub(crate) async fn home(session: SessionHandle) -> Result<Response, AppError> {
    let ctx = page_context(&session).await;
    render(
        StatusCode::OK,
        HomeTemplate {
            logged_in: ctx.logged_in,
            server_time: ctx.server_time,
        },
    )
}

pub(crate) async fn about(session: SessionHandle) -> Result<Response, AppError> {
    let ctx = page_context(&session).await;
    render(
        StatusCode::OK,
        AboutTemplate {
            logged_in: ctx.logged_in,
            server_time: ctx.server_time,
        },
    )
}

pub(crate) async fn not_found(session: SessionHandle) -> Result<Response, AppError> {
    let ctx = page_context(&session).await;
    render(
        StatusCode::NOT_FOUND,
        NotFoundTemplate {
            logged_in: ctx.logged_in,
            server_time: ctx.server_time,
        },
    )
}
