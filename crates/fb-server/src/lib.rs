//! fb-server: HTTP API server for the fundboard workspace.
//!
//! This crate ties the domain logic in `fb-core` and the storage layer in
//! `fb-db` into a running server. It provides:
//!
//! - Axum-based JSON API with per-IP rate limiting and session auth
//! - A background sweeper for idle limiter keys and expired sessions
//! - Graceful shutdown via signal handling

pub mod context;
pub mod error;
pub mod middleware;
pub mod router;
pub mod routes;

use std::net::SocketAddr;

use fb_core::config::Config;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::context::AppContext;

/// Start the fundboard server.
///
/// Opens the database, optionally seeds demo data, and serves the API until
/// SIGINT or SIGTERM.
pub async fn start(config: Config) -> fb_core::Result<()> {
    for warning in config.validate() {
        tracing::warn!("Config warning: {warning}");
    }

    let db_path = &config.server.db_path;
    let existed = db_path.exists();
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
            tracing::info!("Created database directory {}", parent.display());
        }
    }
    let db = fb_db::pool::init_pool(db_path, config.server.pool_size)?;
    if existed {
        tracing::info!("Database opened (existing) at {}", db_path.display());
    } else {
        tracing::info!("Database created (new) at {}", db_path.display());
    }

    if config.seed.on_startup {
        let conn = fb_db::pool::get_conn(&db)?;
        fb_db::seed::seed_demo_data(&conn)?;
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| fb_core::Error::Internal(format!("Invalid server address: {e}")))?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| fb_core::Error::Internal(format!("Failed to bind to {addr}: {e}")))?;

    let ctx = AppContext::new(db, config);
    let cancel = CancellationToken::new();

    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        signal_cancel.cancel();
    });

    tracing::info!("Starting server on {addr}");
    serve(listener, ctx, cancel).await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Serve the API on `listener` until `cancel` fires.
///
/// Runs the limiter/session sweeper alongside the server and waits for it to
/// stop before returning.
pub async fn serve(
    listener: TcpListener,
    ctx: AppContext,
    cancel: CancellationToken,
) -> fb_core::Result<()> {
    let sweeper = tokio::spawn(middleware::rate_limit::run_sweeper(
        ctx.clone(),
        cancel.clone(),
    ));

    let app = router::build_router(ctx);
    let shutdown = cancel.clone();
    let result = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move { shutdown.cancelled().await })
    .await;

    // Stop background work even if the server itself failed.
    cancel.cancel();
    if let Err(e) = sweeper.await {
        tracing::warn!("Sweeper task ended abnormally: {e}");
    }

    result.map_err(|e| fb_core::Error::Internal(format!("Server error: {e}")))
}

/// Wait for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
