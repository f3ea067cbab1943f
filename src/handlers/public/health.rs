// handlers/public/health.rs - GET / and GET /health

use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET / - service banner
pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "NexGuild API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "public": ["/health", "/api/auth/signup", "/api/auth/login", "/api/auth/google", "/api/auth/github"],
            "protected": ["/api/auth/profile", "/api/posts", "/api/projects", "/api/teams", "/api/opportunities"]
        }
    }))
}

/// GET /health - 200 when the store answers, 503 otherwise
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let timestamp = chrono::Utc::now().to_rfc3339();
    let backend = state.store.backend();

    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "timestamp": timestamp,
                "store": backend,
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unhealthy",
                    "timestamp": timestamp,
                    "store": backend,
                    "error": e.to_string(),
                })),
            )
        }
    }
}
