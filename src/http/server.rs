//! HTTP server assembly.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::rates::RateEngine;

use super::handlers::{
    carriers_handler, health_handler, index_handler, metrics_handler, rates_handler,
};

/// Shared application state.
///
/// `engine` is `None` when the rate table failed to load at startup; the
/// server still runs so `/health` can report the failure, and rate queries
/// answer 500 until a restart with a valid table.
pub struct AppState {
    engine: Option<Arc<RateEngine>>,
    start_time: Instant,
}

impl AppState {
    pub fn new(engine: Option<Arc<RateEngine>>) -> Self {
        Self {
            engine,
            start_time: Instant::now(),
        }
    }

    /// The rate engine, if the table loaded.
    pub fn engine(&self) -> Option<&Arc<RateEngine>> {
        self.engine.as_ref()
    }

    /// Uptime since process start.
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/rates", post(rates_handler))
        .route("/carriers", get(carriers_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

/// Bind and serve until ctrl-c.
pub async fn serve(state: Arc<AppState>, address: SocketAddr, permissive_cors: bool) -> Result<()> {
    let mut app = router(state);

    if permissive_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    let listener = TcpListener::bind(address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;

    info!(address = %address, "rate API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
