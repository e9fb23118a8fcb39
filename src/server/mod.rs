//! HTTP server assembly: database pool, migrations, router, serve loop.

mod db;

pub use db::{create_optimized_pool, run_migrations};

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::router;
use crate::state::AppState;

/// Bind and serve until the process receives SIGINT. Pending debounced
/// session saves are flushed before the listener drops.
pub async fn serve(state: AppState, addr: SocketAddr) -> Result<()> {
    let state = Arc::new(state);

    let app = router(Arc::clone(&state))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(120)))
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shutting down, flushing pending session saves");
    state.save_debouncer.flush_all().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to install ctrl-c handler: {}", e);
    }
}
