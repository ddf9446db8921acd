//! JSON request handlers.

use areal::{ArealError, Store};
use areal_types::BoundingBox;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error};

/// Engine error carried out of a handler.
///
/// Maps the error taxonomy onto status codes: bad input is 400, unknown
/// names and files are 404, corrupt data and internal failures are 500.
pub struct ApiError(ArealError);

impl From<ArealError> for ApiError {
    fn from(err: ArealError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ArealError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ArealError::NotFound(_) => StatusCode::NOT_FOUND,
            ArealError::DataCorrupt { .. } | ArealError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("request failed: {}", self.0);
        } else {
            debug!("request rejected: {}", self.0);
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct WindowParams {
    /// `west,south,east,north` in degrees
    bbox: String,
    /// Restrict results to features intersecting this dataset
    within: Option<String>,
}

pub async fn window_query(
    State(store): State<Arc<Store>>,
    Path(dataset): Path<String>,
    Query(params): Query<WindowParams>,
) -> Result<Response, ApiError> {
    let window: BoundingBox = params.bbox.parse().map_err(ArealError::from)?;
    let collection = store.window_query(&dataset, &window, params.within.as_deref())?;
    Ok(Json(&*collection).into_response())
}

#[derive(Debug, Deserialize)]
pub struct MappingParams {
    source: String,
    target: String,
}

pub async fn full_mapping(
    State(store): State<Arc<Store>>,
    Query(params): Query<MappingParams>,
) -> Result<Response, ApiError> {
    let report = store.full_mapping(&params.source, &params.target)?;
    Ok(Json(report).into_response())
}

pub async fn list_datasets(State(store): State<Arc<Store>>) -> Response {
    Json(store.list_datasets()).into_response()
}

pub async fn stats(State(store): State<Arc<Store>>) -> Response {
    Json(store.stats()).into_response()
}
