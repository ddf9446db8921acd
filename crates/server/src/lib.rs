//! Areal Server
//!
//! HTTP server over the areal polygon dataset store.
//!
//! # Endpoints
//!
//! - `GET /api/datasets` - catalog of available datasets
//! - `GET /api/features/:dataset?bbox=w,s,e,n[&within=name]` - window query
//! - `GET /api/mapping?source=a&target=b` - full first-match mapping
//! - `GET /api/stats` - store counters
//! - `GET /api/file?path=rel/path` - raw file passthrough (data root only)
//!
//! # Example
//!
//! ```ignore
//! use areal_server::run_server;
//!
//! run_server(addr, store, shutdown).await?;
//! ```

pub mod files;
pub mod handlers;

use areal::Store;
use axum::Router;
use axum::http::Method;
use axum::routing::get;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Build the API router over a shared store.
///
/// The API is consumed by browser map frontends served from other
/// origins, so all routes allow cross-origin reads.
pub fn router(store: Arc<Store>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods([Method::GET]);

    Router::new()
        .route("/api/datasets", get(handlers::list_datasets))
        .route("/api/features/:dataset", get(handlers::window_query))
        .route("/api/mapping", get(handlers::full_mapping))
        .route("/api/stats", get(handlers::stats))
        .route("/api/file", get(files::passthrough))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

/// Serve the API until the shutdown future resolves.
///
/// # Errors
/// Returns an error if the listener cannot bind or the server fails.
pub async fn run_server(
    addr: SocketAddr,
    store: Arc<Store>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Areal HTTP server listening on {}", listener.local_addr()?);

    axum::serve(listener, router(store))
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
