use areal::{Config, Store};
use areal_server::router;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

fn rect_feature(
    west: f64,
    south: f64,
    east: f64,
    north: f64,
    props: Value,
) -> Value {
    json!({
        "type": "Feature",
        "geometry": {
            "type": "Polygon",
            "coordinates": [[
                [west, south], [east, south], [east, north], [west, north], [west, south]
            ]]
        },
        "properties": props
    })
}

fn write_fixture(root: &Path) {
    let manifest = json!({
        "entries": [
            {
                "name": "plz",
                "path": "plz.geojson",
                "kind": "polygon",
                "label": "Postleitzahlgebiete",
                "id_property": "plz"
            },
            {
                "name": "wahlkreise",
                "path": "wahlkreise.geojson",
                "kind": "polygon",
                "id_property": "WKR_NR"
            }
        ]
    });
    std::fs::write(root.join("datasets.json"), manifest.to_string()).unwrap();

    let plz = json!({
        "type": "FeatureCollection",
        "features": [
            rect_feature(13.3, 52.5, 13.55, 52.7, json!({ "plz": "10115" })),
            rect_feature(9.9, 53.5, 10.1, 53.7, json!({ "plz": "20095" })),
        ]
    });
    std::fs::write(root.join("plz.geojson"), plz.to_string()).unwrap();

    let wahlkreise = json!({
        "type": "FeatureCollection",
        "features": [
            rect_feature(13.2, 52.4, 13.6, 52.8, json!({ "WKR_NR": 75 })),
            rect_feature(13.5, 52.4, 14.0, 52.8, json!({ "WKR_NR": 76 })),
        ]
    });
    std::fs::write(root.join("wahlkreise.geojson"), wahlkreise.to_string()).unwrap();
}

/// Data root nested one level down, so traversal tests have somewhere
/// outside the root to aim at.
fn fixture() -> (TempDir, Router) {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("data");
    std::fs::create_dir(&root).unwrap();
    write_fixture(&root);
    std::fs::write(dir.path().join("secret.txt"), "not yours").unwrap();

    let store = Store::open(Config::default().with_data_root(root)).unwrap();
    (dir, router(Arc::new(store)))
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, body)
}

#[tokio::test]
async fn test_list_datasets() {
    let (_dir, app) = fixture();

    let (status, body) = get(&app, "/api/datasets").await;
    assert_eq!(status, StatusCode::OK);

    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["name"], "plz");
    assert_eq!(entries[0]["label"], "Postleitzahlgebiete");
    assert_eq!(entries[1]["name"], "wahlkreise");
}

#[tokio::test]
async fn test_window_query_returns_feature_collection() {
    let (_dir, app) = fixture();

    let (status, body) = get(&app, "/api/features/plz?bbox=13.0,52.0,14.0,53.0").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "FeatureCollection");

    let features = body["features"].as_array().unwrap();
    assert_eq!(features.len(), 1);
    assert_eq!(features[0]["properties"]["plz"], "10115");
    assert_eq!(features[0]["geometry"]["type"], "Polygon");
}

#[tokio::test]
async fn test_window_query_with_containment_filter() {
    let (_dir, app) = fixture();

    let (status, body) = get(
        &app,
        "/api/features/plz?bbox=13.0,52.0,14.0,53.0&within=wahlkreise",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["features"].as_array().unwrap().len(), 1);

    // Hamburg has a postal area but no district; the filter empties it.
    let (status, body) = get(
        &app,
        "/api/features/plz?bbox=9.5,53.0,10.5,54.0&within=wahlkreise",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["features"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_malformed_bbox_is_bad_request() {
    let (_dir, app) = fixture();

    let (status, body) = get(&app, "/api/features/plz?bbox=oops").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("invalid argument"));

    let (status, _) = get(&app, "/api/features/plz?bbox=13.0,52.0,14.0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Inverted spans are rejected, not silently reordered.
    let (status, _) = get(&app, "/api/features/plz?bbox=14.0,52.0,13.0,53.0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Missing bbox entirely fails query deserialization.
    let (status, _) = get(&app, "/api/features/plz").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_dataset_is_not_found() {
    let (_dir, app) = fixture();

    let (status, body) = get(&app, "/api/features/bundeslaender?bbox=13.0,52.0,14.0,53.0").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("bundeslaender"));
}

#[tokio::test]
async fn test_corrupt_dataset_is_internal_error() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("data");
    std::fs::create_dir(&root).unwrap();
    write_fixture(&root);
    std::fs::write(root.join("plz.geojson"), "broken").unwrap();

    let store = Store::open(Config::default().with_data_root(root)).unwrap();
    let app = router(Arc::new(store));

    let (status, body) = get(&app, "/api/features/plz?bbox=13.0,52.0,14.0,53.0").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("corrupt"));
}

#[tokio::test]
async fn test_full_mapping_pairs() {
    let (_dir, app) = fixture();

    let (status, body) = get(&app, "/api/mapping?source=plz&target=wahlkreise").await;
    assert_eq!(status, StatusCode::OK);

    let pairs = body["pairs"].as_array().unwrap();
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0]["sourceId"], "10115");
    assert_eq!(pairs[0]["targetId"], "75");
    assert_eq!(body["skipped"], 0);

    let (status, _) = get(&app, "/api/mapping?source=plz").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_stats_counters() {
    let (_dir, app) = fixture();

    get(&app, "/api/features/plz?bbox=13.0,52.0,14.0,53.0").await;
    get(&app, "/api/features/plz?bbox=13.0,52.0,14.0,53.0").await;

    let (status, body) = get(&app, "/api/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["window_queries"], 2);
    assert_eq!(body["cache_hits"], 1);
    assert_eq!(body["datasets_loaded"], 1);
}

#[tokio::test]
async fn test_file_passthrough() {
    let (_dir, app) = fixture();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/file?path=plz.geojson")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["type"], "FeatureCollection");
}

#[tokio::test]
async fn test_file_passthrough_missing_is_not_found() {
    let (_dir, app) = fixture();

    let (status, _) = get(&app, "/api/file?path=nope.geojson").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_file_passthrough_rejects_traversal() {
    let (_dir, app) = fixture();

    // secret.txt exists one level above the data root.
    let (status, _) = get(&app, "/api/file?path=../secret.txt").await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = get(&app, "/api/file?path=%2Fetc%2Fpasswd").await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = get(&app, "/api/file?path=foo%2F..%2F..%2Fsecret.txt").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
