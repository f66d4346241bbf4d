//! Salon service (price list) HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use shared::SalonServiceInput;

use crate::services::CatalogService;
use crate::AppState;

/// List all services
pub async fn list_services(State(state): State<AppState>) -> impl IntoResponse {
    let catalog = CatalogService::new(state.db.clone());

    match catalog.list_services().await {
        Ok(services) => (StatusCode::OK, Json(services)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get a service
pub async fn get_service(
    State(state): State<AppState>,
    Path(service_id): Path<i64>,
) -> impl IntoResponse {
    let catalog = CatalogService::new(state.db.clone());

    match catalog.get_service(service_id).await {
        Ok(service) => (StatusCode::OK, Json(service)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Create a service
pub async fn create_service(
    State(state): State<AppState>,
    Json(input): Json<SalonServiceInput>,
) -> impl IntoResponse {
    let catalog = CatalogService::new(state.db.clone());

    match catalog.create_service(input).await {
        Ok(service) => (StatusCode::CREATED, Json(service)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Update a service
pub async fn update_service(
    State(state): State<AppState>,
    Path(service_id): Path<i64>,
    Json(input): Json<SalonServiceInput>,
) -> impl IntoResponse {
    let catalog = CatalogService::new(state.db.clone());

    match catalog.update_service(service_id, input).await {
        Ok(service) => (StatusCode::OK, Json(service)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Delete a service
pub async fn delete_service(
    State(state): State<AppState>,
    Path(service_id): Path<i64>,
) -> impl IntoResponse {
    let catalog = CatalogService::new(state.db.clone());

    match catalog.delete_service(service_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
