//! Health check and fallback handlers

use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;

use crate::error::AppError;
use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub environment: String,
    pub database: String,
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    // Check database connectivity
    let db_status = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => "connected".to_string(),
        Err(e) => {
            tracing::warn!("Health check could not reach the database: {}", e);
            "disconnected".to_string()
        }
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "salon-manager".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.config.environment.clone(),
        database: db_status,
    })
}

/// Unknown routes answer with the regular error envelope
pub async fn not_found() -> impl IntoResponse {
    AppError::not_found("Route")
}
