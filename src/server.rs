//! HTTP server initialization and runtime setup.
//!
//! Handles the database pool, migrations, the click worker and the Axum server
//! lifecycle including graceful shutdown.

use crate::application::click_worker::{ClickQueue, run_click_worker};
use crate::application::services::ClickService;
use crate::config::Config;
use crate::infrastructure::identity::JwtIdentityProvider;
use crate::infrastructure::persistence::PgLinkRepository;
use crate::routes::app_router;
use crate::state::{AppState, PublicSettings};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Upper bound on how long shutdown waits for queued clicks to be written.
const CLICK_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Opens the connection pool using the configured limits.
pub async fn connect_pool(config: &Config) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Background click worker
/// - Axum HTTP server
///
/// On SIGINT/SIGTERM the server stops accepting connections, finishes
/// in-flight requests, then waits for the click worker to drain.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_pool(&config).await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to apply migrations")?;

    let pool = Arc::new(pool);

    let (click_queue, click_rx) = ClickQueue::new(config.click_queue_capacity);
    let click_service = Arc::new(ClickService::new(Arc::new(PgLinkRepository::new(
        pool.clone(),
    ))));
    let worker = tokio::spawn(run_click_worker(
        click_rx,
        click_service,
        config.click_worker_concurrency,
    ));

    let identity = JwtIdentityProvider::new(
        &config.jwt_secret,
        chrono::Duration::hours(config.session_ttl_hours),
        chrono::Duration::minutes(config.reset_token_ttl_minutes),
    );

    let settings = PublicSettings {
        base_url: config.base_url.clone(),
        behind_proxy: config.behind_proxy,
        expose_reset_tokens: config.expose_reset_tokens,
    };

    let state = AppState::new(
        pool.clone(),
        identity,
        config.jwt_secret.clone(),
        click_queue,
        settings,
    );

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped, draining click queue");

    // The worker exits once the router, and with it every queue sender, is dropped.
    match tokio::time::timeout(CLICK_DRAIN_TIMEOUT, worker).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!(error = %e, "Click worker panicked"),
        Err(_) => tracing::warn!("Click queue not drained before timeout"),
    }

    pool.close().await;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
