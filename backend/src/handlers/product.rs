//! Product and stock HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use shared::{ProductInput, StockAdjustmentInput};

use crate::services::ProductService;
use crate::AppState;

/// List all products with their stock status
pub async fn list_products(State(state): State<AppState>) -> impl IntoResponse {
    let service = ProductService::new(state.db.clone());

    match service.list_products().await {
        Ok(products) => (StatusCode::OK, Json(products)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Products at or below their alert threshold
pub async fn list_low_stock(State(state): State<AppState>) -> impl IntoResponse {
    let service = ProductService::new(state.db.clone());

    match service.list_low_stock().await {
        Ok(products) => (StatusCode::OK, Json(products)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get a product
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> impl IntoResponse {
    let service = ProductService::new(state.db.clone());

    match service.get_product(product_id).await {
        Ok(product) => (StatusCode::OK, Json(product)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Create a product
pub async fn create_product(
    State(state): State<AppState>,
    Json(input): Json<ProductInput>,
) -> impl IntoResponse {
    let service = ProductService::new(state.db.clone());

    match service.create_product(input).await {
        Ok(product) => (StatusCode::CREATED, Json(product)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Replace a product's editable fields
pub async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
    Json(input): Json<ProductInput>,
) -> impl IntoResponse {
    let service = ProductService::new(state.db.clone());

    match service.update_product(product_id, input).await {
        Ok(product) => (StatusCode::OK, Json(product)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Delete a product
pub async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> impl IntoResponse {
    let service = ProductService::new(state.db.clone());

    match service.delete_product(product_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}

/// Apply a signed stock adjustment
pub async fn adjust_stock(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
    Json(input): Json<StockAdjustmentInput>,
) -> impl IntoResponse {
    let service = ProductService::new(state.db.clone());

    match service.adjust_stock(product_id, input).await {
        Ok(product) => (StatusCode::OK, Json(product)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Stock adjustment history of a product
pub async fn list_adjustments(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> impl IntoResponse {
    let service = ProductService::new(state.db.clone());

    match service.list_adjustments(product_id).await {
        Ok(adjustments) => (StatusCode::OK, Json(adjustments)).into_response(),
        Err(e) => e.into_response(),
    }
}
