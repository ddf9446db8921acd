//! Raw file passthrough, restricted to the data root.

use areal::Store;
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use std::path::{Component, Path};
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Deserialize)]
pub struct FileParams {
    /// File path relative to the data root
    path: String,
}

pub async fn passthrough(
    State(store): State<Arc<Store>>,
    Query(params): Query<FileParams>,
) -> Response {
    serve_data_file(store.data_root(), &params.path).await
}

/// Resolve a requested path against the data root and serve it.
///
/// Any path escaping the root is rejected: absolute paths and `..`
/// components up front, symlink escapes by a prefix check on the
/// canonicalized path.
async fn serve_data_file(data_root: &Path, requested: &str) -> Response {
    let relative = Path::new(requested);
    if relative.is_absolute()
        || relative
            .components()
            .any(|part| matches!(part, Component::ParentDir))
    {
        warn!("rejected path escaping the data root: {requested}");
        return (StatusCode::FORBIDDEN, "path outside data root").into_response();
    }

    let root = match tokio::fs::canonicalize(data_root).await {
        Ok(root) => root,
        Err(err) => {
            warn!("data root unavailable: {err}");
            return (StatusCode::INTERNAL_SERVER_ERROR, "data root unavailable").into_response();
        }
    };
    let resolved = match tokio::fs::canonicalize(root.join(relative)).await {
        Ok(resolved) => resolved,
        Err(_) => return (StatusCode::NOT_FOUND, "no such file").into_response(),
    };
    if !resolved.starts_with(&root) {
        warn!("rejected path escaping the data root: {requested}");
        return (StatusCode::FORBIDDEN, "path outside data root").into_response();
    }
    if !resolved.is_file() {
        return (StatusCode::NOT_FOUND, "no such file").into_response();
    }

    serve_file(&resolved, content_type_for(&resolved)).await
}

fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("geojson") | Some("json") => "application/json",
        Some("csv") => "text/csv",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

async fn serve_file(path: &Path, content_type: &'static str) -> Response {
    match tokio::fs::read(path).await {
        Ok(data) => {
            let mut headers = HeaderMap::new();
            headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
            (StatusCode::OK, headers, Body::from(data)).into_response()
        }
        Err(err) => {
            warn!("file read failed: {} -> {err}", path.display());
            (StatusCode::NOT_FOUND, "no such file").into_response()
        }
    }
}
