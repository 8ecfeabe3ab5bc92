//! Coupon Service - HTTP API for coupon claims
//!
//! This is the main entry point for the coupon service.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use coupon_service::{create_router, AppState, ServiceConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,coupon=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Coupon Service");

    // Load configuration from environment
    let config = ServiceConfig::from_env();
    let store_config = config.store_config();

    tracing::info!(
        listen_addr = %config.listen_addr,
        database_url = %store_config.redacted_url(),
        db_max_connections = config.db_max_connections,
        run_migrations = config.run_migrations,
        "Service configuration loaded"
    );

    // The pool lives for the whole process and is closed on shutdown
    let store = coupon_store::connect(&store_config).await?;
    if config.run_migrations {
        store.migrate().await?;
    }

    let state = AppState::new(store.clone(), config.clone());
    let app = create_router(state);
    tracing::info!("Router configured with all API endpoints");

    tracing::info!(listen_addr = %config.listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("HTTP server stopped, closing database pool");
    store.close().await;

    Ok(())
}

/// Resolve on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
