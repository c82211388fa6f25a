//! oauth2_session_axum - Axum web layer for oauth2_session
//!
//! Provides the application router with session handling, the access guard
//! for protected pages and the askama-rendered pages.

mod config;
mod error;
mod middleware;
mod oauth2;
mod pages;
mod router;
mod session;

#[cfg(test)]
mod test_utils;

pub use config::AppContext;
pub use error::{AppError, report_errors};
pub use middleware::require_token;
pub use router::{app_router, app_router_no_trace};
pub use session::{SessionHandle, session_layer};

// Re-export the core crate so binaries need only this one
pub use oauth2_session;
