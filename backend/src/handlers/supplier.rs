//! Supplier HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use shared::SupplierInput;

use crate::services::SupplierService;
use crate::AppState;

/// List all suppliers
pub async fn list_suppliers(State(state): State<AppState>) -> impl IntoResponse {
    let service = SupplierService::new(state.db.clone());

    match service.list_suppliers().await {
        Ok(suppliers) => (StatusCode::OK, Json(suppliers)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get a supplier
pub async fn get_supplier(
    State(state): State<AppState>,
    Path(supplier_id): Path<i64>,
) -> impl IntoResponse {
    let service = SupplierService::new(state.db.clone());

    match service.get_supplier(supplier_id).await {
        Ok(supplier) => (StatusCode::OK, Json(supplier)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Create a supplier
pub async fn create_supplier(
    State(state): State<AppState>,
    Json(input): Json<SupplierInput>,
) -> impl IntoResponse {
    let service = SupplierService::new(state.db.clone());

    match service.create_supplier(input).await {
        Ok(supplier) => (StatusCode::CREATED, Json(supplier)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Update a supplier
pub async fn update_supplier(
    State(state): State<AppState>,
    Path(supplier_id): Path<i64>,
    Json(input): Json<SupplierInput>,
) -> impl IntoResponse {
    let service = SupplierService::new(state.db.clone());

    match service.update_supplier(supplier_id, input).await {
        Ok(supplier) => (StatusCode::OK, Json(supplier)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Delete a supplier
pub async fn delete_supplier(
    State(state): State<AppState>,
    Path(supplier_id): Path<i64>,
) -> impl IntoResponse {
    let service = SupplierService::new(state.db.clone());

    match service.delete_supplier(supplier_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
