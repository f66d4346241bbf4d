//! Business logic services for the Salon Manager

pub mod appointment;
pub mod catalog;
pub mod client;
pub mod invoice;
pub mod product;
pub mod purchase;
pub mod stats;
pub mod supplier;

pub use appointment::AppointmentService;
pub use catalog::CatalogService;
pub use client::ClientService;
pub use invoice::InvoiceService;
pub use product::ProductService;
pub use purchase::PurchaseService;
pub use stats::StatsService;
pub use supplier::SupplierService;

use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};

/// Whether a row with `id` exists in `table`
pub(crate) async fn record_exists(db: &SqlitePool, table: &'static str, id: i64) -> AppResult<bool> {
    let exists: bool = sqlx::query_scalar(&format!(
        "SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?)"
    ))
    .bind(id)
    .fetch_one(db)
    .await?;

    Ok(exists)
}

/// Fail with a conflict when rows of `table` still point at `id` through `column`
pub(crate) async fn ensure_unreferenced(
    db: &SqlitePool,
    resource: &str,
    table: &'static str,
    column: &'static str,
    id: i64,
    message: &str,
) -> AppResult<()> {
    let count: i64 = sqlx::query_scalar(&format!(
        "SELECT COUNT(*) FROM {table} WHERE {column} = ?"
    ))
    .bind(id)
    .fetch_one(db)
    .await?;

    if count > 0 {
        return Err(AppError::Conflict {
            resource: resource.to_string(),
            message: message.to_string(),
        });
    }

    Ok(())
}

/// Keep the stored value for fields absent from a partial update
pub(crate) fn merge<T>(incoming: Option<T>, stored: Option<T>) -> Option<T> {
    incoming.or(stored)
}
