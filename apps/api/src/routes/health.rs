use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns the service version and which store backend is serving requests.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let store = state
        .store
        .as_ref()
        .map_or("unavailable", |s| s.backend_tag());
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "gym-api",
        "store": store
    }))
}
