//! Route definitions for the Salon Manager API

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes, mounted under `/api`
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Salon front desk
        .nest("/clients", client_routes())
        .nest("/services", service_routes())
        .nest("/appointments", appointment_routes())
        .nest("/invoices", invoice_routes())
        // Inventory and purchasing
        .nest("/suppliers", supplier_routes())
        .nest("/products", product_routes())
        .nest("/purchases", purchase_routes())
        // Dashboard
        .route("/stats", get(handlers::get_dashboard_stats))
}

fn client_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_clients).post(handlers::create_client))
        .route(
            "/:client_id",
            get(handlers::get_client)
                .put(handlers::update_client)
                .delete(handlers::delete_client),
        )
}

/// Salon service (price list) routes
fn service_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_services).post(handlers::create_service))
        .route(
            "/:service_id",
            get(handlers::get_service)
                .put(handlers::update_service)
                .delete(handlers::delete_service),
        )
}

fn appointment_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_appointments).post(handlers::create_appointment),
        )
        .route(
            "/:appointment_id",
            get(handlers::get_appointment)
                .put(handlers::update_appointment)
                .delete(handlers::delete_appointment),
        )
}

fn invoice_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_invoices).post(handlers::create_invoice))
        .route(
            "/:invoice_id",
            get(handlers::get_invoice)
                .put(handlers::update_invoice)
                .delete(handlers::delete_invoice),
        )
}

fn supplier_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_suppliers).post(handlers::create_supplier))
        .route(
            "/:supplier_id",
            get(handlers::get_supplier)
                .put(handlers::update_supplier)
                .delete(handlers::delete_supplier),
        )
}

/// Product and stock routes
fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_products).post(handlers::create_product))
        .route("/low-stock", get(handlers::list_low_stock))
        .route(
            "/:product_id",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .route("/:product_id/adjust-stock", post(handlers::adjust_stock))
        .route("/:product_id/adjustments", get(handlers::list_adjustments))
}

/// Purchase routes
fn purchase_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_purchases).post(handlers::create_purchase))
        .route("/stats", get(handlers::get_purchase_stats))
        .route(
            "/supplier/:supplier_id",
            get(handlers::list_purchases_by_supplier),
        )
        .route(
            "/:purchase_id",
            get(handlers::get_purchase)
                .put(handlers::update_purchase)
                .delete(handlers::delete_purchase),
        )
}
