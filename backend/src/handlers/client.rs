//! Client management HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use shared::ClientInput;

use crate::services::ClientService;
use crate::AppState;

/// List all clients
pub async fn list_clients(State(state): State<AppState>) -> impl IntoResponse {
    let service = ClientService::new(state.db.clone());

    match service.list_clients().await {
        Ok(clients) => (StatusCode::OK, Json(clients)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn get_client(
    State(state): State<AppState>,
    Path(client_id): Path<i64>,
) -> impl IntoResponse {
    let service = ClientService::new(state.db.clone());

    match service.get_client(client_id).await {
        Ok(client) => (StatusCode::OK, Json(client)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Create a client
pub async fn create_client(
    State(state): State<AppState>,
    Json(input): Json<ClientInput>,
) -> impl IntoResponse {
    let service = ClientService::new(state.db.clone());

    match service.create_client(input).await {
        Ok(client) => (StatusCode::CREATED, Json(client)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Update a client (partial)
pub async fn update_client(
    State(state): State<AppState>,
    Path(client_id): Path<i64>,
    Json(input): Json<ClientInput>,
) -> impl IntoResponse {
    let service = ClientService::new(state.db.clone());

    match service.update_client(client_id, input).await {
        Ok(client) => (StatusCode::OK, Json(client)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Delete a client
pub async fn delete_client(
    State(state): State<AppState>,
    Path(client_id): Path<i64>,
) -> impl IntoResponse {
    let service = ClientService::new(state.db.clone());

    match service.delete_client(client_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
