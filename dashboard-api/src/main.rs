//! # Société Dashboard API Server
//!
//! Serves the admin dashboard: login, the client listing, client detail,
//! dashboard counters and a health check, all as JSON envelopes.
//!
//! ## Lifecycle
//!
//! 1. Load configuration and hash the account password if needed
//! 2. Connect both MySQL stores (a failure is logged; fallback data is served)
//! 3. Start the reconnect supervisor
//! 4. Serve until Ctrl+C or SIGTERM, draining in-flight requests
//! 5. Stop the supervisor, then close the pools
//!
//! ## Usage
//!
//! ```bash
//! JWT_SECRET=... ADMIN_PASSWORD=... cargo run -p dashboard-api
//! ```

use dashboard_api::{
    app::{build_router, AppState},
    config::Config,
    reconnect,
};
use dashboard_shared::repository::{ClientRepository, ClientStore};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env may carry RUST_LOG / LOG_FORMAT
    dotenvy::dotenv().ok();
    init_tracing();

    tracing::info!(
        "Société Dashboard API v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;
    let credentials = config.admin.credentials()?;

    let store: Arc<dyn ClientStore> = Arc::new(ClientRepository::new(
        config.database.primary.clone(),
        config.database.secondary.clone(),
    ));

    if let Err(e) = store.connect().await {
        tracing::warn!(error = %e, "Database unavailable at startup, serving fallback data");
    }

    let shutdown = CancellationToken::new();
    let supervisor = reconnect::spawn(
        store.clone(),
        Duration::from_secs(config.database.reconnect_interval_seconds),
        shutdown.clone(),
    );

    let bind_address = config.bind_address();
    let app = build_router(AppState::new(store.clone(), credentials, config));

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("HTTP server drained, releasing resources");

    shutdown.cancel();
    if let Some(handle) = supervisor {
        if let Err(e) = handle.await {
            tracing::warn!(error = %e, "Reconnect supervisor ended abnormally");
        }
    }

    store.disconnect().await;
    tracing::info!("Shutdown complete");

    Ok(())
}

/// Installs the global subscriber; `LOG_FORMAT=json` switches to JSON lines
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "dashboard_api=debug,dashboard_shared=info,tower_http=debug".into());

    let json = std::env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
