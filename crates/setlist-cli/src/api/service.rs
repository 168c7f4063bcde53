//! Service endpoints: static sound list, build version and health

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use super::AppState;

/// GET /sound
pub async fn sound() -> Json<Vec<u32>> {
    Json(vec![1, 2, 3, 4])
}

/// GET /version
pub async fn version(State(state): State<AppState>) -> String {
    format!(
        "Job ID: {}\nCommit ID: {}",
        state.build.job_id, state.build.commit_id
    )
}

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

pub fn service_routes() -> Router<AppState> {
    Router::new()
        .route("/sound", get(sound))
        .route("/version", get(version))
        .route("/health", get(health))
}
