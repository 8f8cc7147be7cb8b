use super::*;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use serde_json::{Value, json};

// =============================================================================
// STUB STORE
// =============================================================================

type Matrix = Arc<Mutex<Vec<Vec<u8>>>>;

async fn list() -> Json<Value> {
    Json(json!([
        {"json": "3.json", "module": 3, "width": 30, "height": 30,
         "original_exists": true, "original_name": "3.png", "stem": "3"},
        {"json": "bad.json", "module": null, "width": null, "height": null,
         "original_exists": false, "original_name": null, "stem": "bad"},
    ]))
}

async fn load(State(matrix): State<Matrix>, Query(params): Query<HashMap<String, String>>) -> (StatusCode, Json<Value>) {
    match params.get("file").map(String::as_str) {
        Some("3.json") => {
            let vector = matrix.lock().unwrap().clone();
            (StatusCode::OK, Json(json!({"file": "3.png", "module": 3, "width": 30, "height": 30, "vector": vector})))
        }
        Some("a b&c.json") => (StatusCode::OK, Json(json!({"module": 1, "width": 1, "height": 1, "vector": [[1]]}))),
        Some("ragged.json") => (StatusCode::OK, Json(json!({"module": 2, "width": 2, "height": 2, "vector": [[0, 1]]}))),
        _ => (StatusCode::NOT_FOUND, Json(json!({"error": "not found"}))),
    }
}

async fn toggle(State(matrix): State<Matrix>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let gx = body["gx"].as_u64().unwrap_or(u64::MAX) as usize;
    let gy = body["gy"].as_u64().unwrap_or(u64::MAX) as usize;
    if body["file"] != "3.json" {
        return (StatusCode::NOT_FOUND, Json(json!({"error": "not found"})));
    }
    let mut matrix = matrix.lock().unwrap();
    let Some(cell) = matrix.get_mut(gy).and_then(|row| row.get_mut(gx)) else {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "index out of range"})));
    };
    *cell = 1 - *cell;
    (StatusCode::OK, Json(json!({"ok": true, "value": *cell})))
}

async fn save(Json(body): Json<Value>) -> Json<Value> {
    let file = body["file"].as_str().unwrap_or_default();
    Json(json!({"ok": true, "saved": format!("/data/{file}")}))
}

async fn export(Json(body): Json<Value>) -> Json<Value> {
    let name = body["out_name"].as_str().unwrap_or("3.png");
    Json(json!({"ok": true, "saved": format!("/exports/{name}")}))
}

async fn health() -> Json<Value> {
    Json(json!({"ok": true}))
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(5)).await;
    Json(json!([]))
}

async fn spawn_stub() -> (HttpArtifactStore, Matrix) {
    let matrix: Matrix = Arc::new(Mutex::new(vec![vec![1, 0, 1], vec![0, 1, 0], vec![1, 0, 1]]));
    let app = Router::new()
        .route("/api/list", get(list))
        .route("/api/load", get(load))
        .route("/api/toggle", post(toggle))
        .route("/api/save", post(save))
        .route("/api/export_png", post(export))
        .route("/health", get(health))
        .with_state(matrix.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = StoreConfig::new(&format!("http://{addr}/"), 5).unwrap();
    (HttpArtifactStore::new(&config).unwrap(), matrix)
}

// =============================================================================
// URLS
// =============================================================================

#[test]
fn image_urls_encode_ids() {
    let config = StoreConfig::new("http://store:5000", 5).unwrap();
    let store = HttpArtifactStore::new(&config).unwrap();
    assert_eq!(store.thumbnail_url("3.json", 256), "http://store:5000/api/render?file=3.json&size=256");
    assert_eq!(store.original_url("a b&c.json", 300), "http://store:5000/api/original?file=a%20b%26c.json&size=300");
}

#[test]
fn rejection_prefers_error_payload() {
    assert_eq!(rejection(404, r#"{"error":"not found"}"#), StoreError::rejected(Some(404), "not found"));
    assert_eq!(rejection(502, ""), StoreError::rejected(Some(502), "HTTP 502"));
    assert_eq!(rejection(500, "boom\n"), StoreError::rejected(Some(500), "HTTP 500: boom"));
}

// =============================================================================
// ENDPOINTS
// =============================================================================

#[tokio::test]
async fn list_returns_all_entries() {
    let (store, _) = spawn_stub().await;
    let items = store.list_artifacts().await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].id, "3.json");
    assert!(items[0].original_exists);
    assert_eq!(items[1].module, None);
}

#[tokio::test]
async fn load_returns_matrix() {
    let (store, _) = spawn_stub().await;
    let data = store.load_artifact("3.json").await.unwrap();
    assert_eq!(data.module, 3);
    assert_eq!(data.to_grid().unwrap().get(1, 1).unwrap(), 1);
}

#[tokio::test]
async fn load_encodes_query_value() {
    let (store, _) = spawn_stub().await;
    let data = store.load_artifact("a b&c.json").await.unwrap();
    assert_eq!(data.vector, vec![vec![1]]);
}

#[tokio::test]
async fn load_missing_is_rejected_with_store_message() {
    let (store, _) = spawn_stub().await;
    let err = store.load_artifact("nope.json").await.unwrap_err();
    assert_eq!(err, StoreError::rejected(Some(404), "not found"));
}

#[tokio::test]
async fn load_ragged_matrix_parses_but_fails_validation() {
    let (store, _) = spawn_stub().await;
    let data = store.load_artifact("ragged.json").await.unwrap();
    assert!(data.to_grid().is_err());
}

#[tokio::test]
async fn toggle_returns_authoritative_value() {
    let (store, matrix) = spawn_stub().await;
    assert_eq!(store.toggle_cell("3.json", Cell::new(1, 1)).await.unwrap(), 0);
    assert_eq!(matrix.lock().unwrap()[1][1], 0);
    assert_eq!(store.toggle_cell("3.json", Cell::new(1, 1)).await.unwrap(), 1);
}

#[tokio::test]
async fn toggle_out_of_range_is_rejected() {
    let (store, _) = spawn_stub().await;
    let err = store.toggle_cell("3.json", Cell::new(9, 0)).await.unwrap_err();
    assert_eq!(err, StoreError::rejected(Some(400), "index out of range"));
}

#[tokio::test]
async fn save_and_export_return_written_paths() {
    let (store, _) = spawn_stub().await;
    let grid = GridModel::from_rows(&[vec![1]], 1, 1, 1).unwrap();
    assert_eq!(store.save_artifact("3.json", &grid).await.unwrap(), "/data/3.json");
    assert_eq!(store.export_png("3.json", None).await.unwrap(), "/exports/3.png");
    assert_eq!(store.export_png("3.json", Some("out.png")).await.unwrap(), "/exports/out.png");
}

#[tokio::test]
async fn health_is_ok() {
    let (store, _) = spawn_stub().await;
    store.health().await.unwrap();
}

#[tokio::test]
async fn unknown_route_is_rejected() {
    let (store, _) = spawn_stub().await;
    let err = store.get_json::<Value>(&store.endpoint("/api/missing")).await.unwrap_err();
    assert!(matches!(err, StoreError::Rejected { status: Some(404), .. }));
}

#[tokio::test]
async fn unreachable_store_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let store = HttpArtifactStore::new(&StoreConfig::new(&format!("http://{addr}"), 2).unwrap()).unwrap();
    let err = store.list_artifacts().await.unwrap_err();
    assert!(matches!(err, StoreError::Transport(_)), "got {err:?}");
}

#[tokio::test]
async fn slow_store_times_out() {
    let app = Router::new().route("/api/list", get(slow));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    let store = HttpArtifactStore::new(&StoreConfig::new(&format!("http://{addr}"), 1).unwrap()).unwrap();
    assert_eq!(store.list_artifacts().await.unwrap_err(), StoreError::Timeout);
}
