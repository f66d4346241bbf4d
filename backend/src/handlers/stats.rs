//! Dashboard statistics handler

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::services::StatsService;
use crate::AppState;

pub async fn get_dashboard_stats(State(state): State<AppState>) -> impl IntoResponse {
    let service = StatsService::new(state.db.clone());

    match service.dashboard().await {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => e.into_response(),
    }
}
