//! Application router

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use oauth2_session::{LOGIN_RENEW_PATH, PROTECTED_PATH};

use crate::config::AppContext;
use crate::error::report_errors;
use crate::middleware::require_token;
use crate::session::session_layer;
use crate::{oauth2, pages};

/// Create the application router
///
/// Routes:
/// - `GET /`, `GET /about`
/// - `POST /login`, `POST /logout`
/// - `GET <callback path of GOOGLE_REDIRECT_URI>`
/// - `GET /login-renew`
/// - `GET /protected`, only with a token in the session
///
/// Anything else renders the 404 page.
pub fn app_router(ctx: AppContext) -> Router {
    app_router_no_trace(ctx).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(
                DefaultOnResponse::new()
                    .level(Level::INFO)
                    .latency_unit(LatencyUnit::Millis),
            ),
    )
}

/// Same as [`app_router`] without the HTTP trace layer.
pub fn app_router_no_trace(ctx: AppContext) -> Router {
    let callback_path = ctx.config.oauth2.callback_path().to_string();

    let protected = Router::new()
        .route(PROTECTED_PATH, get(oauth2::protected))
        .route_layer(middleware::from_fn(require_token));

    Router::new()
        .route("/", get(pages::home))
        .route("/about", get(pages::about))
        .route("/login", post(oauth2::login))
        .route("/logout", post(oauth2::logout_handler))
        .route(&callback_path, get(oauth2::callback))
        .route(LOGIN_RENEW_PATH, get(oauth2::login_renew))
        .merge(protected)
        .fallback(pages::not_found)
        .layer(middleware::from_fn_with_state(ctx.clone(), session_layer))
        .layer(middleware::from_fn(report_errors))
        .with_state(ctx)
}
