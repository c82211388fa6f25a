use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};

use oauth2_session::{
    AuthResponse, FlowRedirect, access_protected_resource, handle_callback, initiate_login,
    logout, renew_login,
};

use crate::config::AppContext;
use crate::error::AppError;
use crate::pages;
use crate::session::SessionHandle;

/// 303 See Other to the flow's next location.
fn redirect(target: FlowRedirect) -> Response {
    tracing::debug!("Redirecting to {}", target.location());
    Redirect::to(target.location()).into_response()
}

pub(crate) async fn login(
    State(ctx): State<AppContext>,
    session: SessionHandle,
) -> Result<Response, AppError> {
    let mut session = session.lock().await;
    let target = initiate_login(&mut session, ctx.oauth.as_ref())?;
    Ok(redirect(target))
}

pub(crate) async fn callback(
    State(ctx): State<AppContext>,
    session: SessionHandle,
    Query(auth_response): Query<AuthResponse>,
) -> Result<Response, AppError> {
    let mut session = session.lock().await;
    let target = handle_callback(&mut session, ctx.oauth.as_ref(), &auth_response).await?;
    Ok(redirect(target))
}

pub(crate) async fn login_renew(
    State(ctx): State<AppContext>,
    session: SessionHandle,
) -> Result<Response, AppError> {
    let mut session = session.lock().await;
    let target = renew_login(&mut session, ctx.oauth.as_ref())?;
    Ok(redirect(target))
}

pub(crate) async fn logout_handler(session: SessionHandle) -> Response {
    let target = logout(&mut *session.lock().await);
    redirect(target)
}

pub(crate) async fn protected(
    State(ctx): State<AppContext>,
    session: SessionHandle,
) -> Result<Response, AppError> {
    let resource = {
        let mut session = session.lock().await;
        access_protected_resource(&mut session, ctx.oauth.as_ref()).await?
    };
    pages::protected_page(resource)
}
