use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::services::ReadingService;

pub async fn health(State(service): State<ReadingService>) -> (StatusCode, Json<Value>) {
    match service.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "database": { "connected": true },
            })),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "database": { "connected": false },
                })),
            )
        }
    }
}
