//! Health check HTTP handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use tracing::warn;

use crate::web::AppState;

/// Reports `healthy` when the backing store answers a trivial read
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.listing.list_categories().await {
        Ok(_) => (StatusCode::OK, Json(json!({ "status": "healthy" }))),
        Err(e) => {
            warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unhealthy" })),
            )
        }
    }
}
