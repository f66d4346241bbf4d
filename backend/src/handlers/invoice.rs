//! Invoice HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use shared::InvoiceInput;

use crate::services::InvoiceService;
use crate::AppState;

/// List all invoices
pub async fn list_invoices(State(state): State<AppState>) -> impl IntoResponse {
    let service = InvoiceService::new(state.db.clone());

    match service.list_invoices().await {
        Ok(invoices) => (StatusCode::OK, Json(invoices)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get an invoice
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<i64>,
) -> impl IntoResponse {
    let service = InvoiceService::new(state.db.clone());

    match service.get_invoice(invoice_id).await {
        Ok(invoice) => (StatusCode::OK, Json(invoice)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Issue an invoice
pub async fn create_invoice(
    State(state): State<AppState>,
    Json(input): Json<InvoiceInput>,
) -> impl IntoResponse {
    let service = InvoiceService::new(state.db.clone());

    match service.create_invoice(input).await {
        Ok(invoice) => (StatusCode::CREATED, Json(invoice)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Update an invoice
pub async fn update_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<i64>,
    Json(input): Json<InvoiceInput>,
) -> impl IntoResponse {
    let service = InvoiceService::new(state.db.clone());

    match service.update_invoice(invoice_id, input).await {
        Ok(invoice) => (StatusCode::OK, Json(invoice)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Delete an invoice
pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<i64>,
) -> impl IntoResponse {
    let service = InvoiceService::new(state.db.clone());

    match service.delete_invoice(invoice_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
