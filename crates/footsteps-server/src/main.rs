mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use footsteps_api::AppStateInner;
use footsteps_db::{Database, RestStore, Store};
use footsteps_mail::Notifier;

use crate::config::{Config, StoreConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "footsteps=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    let store = match &config.store {
        StoreConfig::Hosted {
            url,
            anon_key,
            timeout,
        } => Store::Hosted(RestStore::new(url, anon_key, *timeout)?),
        StoreConfig::Local { path } => Store::local(Database::open(path)?),
    };
    info!("Using {} store", store.backend());

    let notifier = config.smtp.as_ref().map(Notifier::smtp).transpose()?;

    if config.analytics_token.is_none() {
        warn!("FOOTSTEPS_ANALYTICS_TOKEN not set, /api/waitlist/analytics is public");
    }

    let state = Arc::new(AppStateInner {
        store,
        notifier,
        analytics_token: config.analytics_token.clone(),
    });

    let mut app = footsteps_api::router(state);
    if let Some(dir) = &config.static_dir {
        info!("Serving static files from {}", dir.display());
        app = app.fallback_service(ServeDir::new(dir));
    }
    let app = app
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Footsteps site listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                ctrl_c.await.ok();
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
