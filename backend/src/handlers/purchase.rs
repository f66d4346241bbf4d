//! Purchase HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use shared::PurchaseInput;

use crate::services::PurchaseService;
use crate::AppState;

/// List all purchases
pub async fn list_purchases(State(state): State<AppState>) -> impl IntoResponse {
    let service = PurchaseService::new(state.db.clone());

    match service.list_purchases().await {
        Ok(purchases) => (StatusCode::OK, Json(purchases)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Purchase spending statistics
pub async fn get_purchase_stats(State(state): State<AppState>) -> impl IntoResponse {
    let service = PurchaseService::new(state.db.clone());

    match service.get_stats().await {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// List the purchases made from one supplier
pub async fn list_purchases_by_supplier(
    State(state): State<AppState>,
    Path(supplier_id): Path<i64>,
) -> impl IntoResponse {
    let service = PurchaseService::new(state.db.clone());

    match service.list_by_supplier(supplier_id).await {
        Ok(purchases) => (StatusCode::OK, Json(purchases)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get a purchase with its lines
pub async fn get_purchase(
    State(state): State<AppState>,
    Path(purchase_id): Path<i64>,
) -> impl IntoResponse {
    let service = PurchaseService::new(state.db.clone());

    match service.get_purchase(purchase_id).await {
        Ok(purchase) => (StatusCode::OK, Json(purchase)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Record a purchase
pub async fn create_purchase(
    State(state): State<AppState>,
    Json(input): Json<PurchaseInput>,
) -> impl IntoResponse {
    let service = PurchaseService::new(state.db.clone());

    match service.create_purchase(input).await {
        Ok(purchase) => (StatusCode::CREATED, Json(purchase)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Replace a purchase and its lines
pub async fn update_purchase(
    State(state): State<AppState>,
    Path(purchase_id): Path<i64>,
    Json(input): Json<PurchaseInput>,
) -> impl IntoResponse {
    let service = PurchaseService::new(state.db.clone());

    match service.update_purchase(purchase_id, input).await {
        Ok(purchase) => (StatusCode::OK, Json(purchase)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Delete a purchase
pub async fn delete_purchase(
    State(state): State<AppState>,
    Path(purchase_id): Path<i64>,
) -> impl IntoResponse {
    let service = PurchaseService::new(state.db.clone());

    match service.delete_purchase(purchase_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
