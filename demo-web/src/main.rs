use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use oauth2_session_axum::oauth2_session::{Config, SessionStore};
use oauth2_session_axum::{AppContext, app_router};

mod server;

use crate::server::{spawn_http_server, spawn_https_server};

/// How often expired session records are purged.
const CLEANUP_INTERVAL: Duration = Duration::from_secs(5 * 60);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "{}=debug,oauth2_session=debug,oauth2_session_axum=debug,tower_http=info",
                    env!("CARGO_CRATE_NAME")
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let port = config.port;
    let tls = config.tls.clone();

    let ctx = AppContext::from_config(config).await?;
    spawn_session_cleanup(ctx.store().clone());

    let app = app_router(ctx);

    let server = match tls {
        Some(tls) => {
            // Install default CryptoProvider for rustls to prevent:
            // "no process-level CryptoProvider available -- call CryptoProvider::install_default() before this point"
            if rustls::crypto::ring::default_provider()
                .install_default()
                .is_err()
            {
                tracing::warn!("A rustls CryptoProvider was already installed");
            }
            spawn_https_server(port, app, &tls).await?
        }
        None => spawn_http_server(port, app),
    };

    server.await??;
    Ok(())
}

fn spawn_session_cleanup(store: std::sync::Arc<dyn SessionStore>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            match store.cleanup_expired().await {
                Ok(0) => {}
                Ok(n) => tracing::info!("Removed {} expired sessions", n),
                Err(e) => tracing::error!("Failed to clean up expired sessions: {}", e),
            }
        }
    });
}
