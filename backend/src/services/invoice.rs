//! Invoice service

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;
use shared::money::from_cents;
use shared::{validate_invoice, InvoiceDraft, InvoiceInput, InvoiceStatus};
use sqlx::{FromRow, SqlitePool};

use crate::error::{AppError, AppResult};
use crate::services::{merge, record_exists};

/// Invoice service for billing appointments
#[derive(Clone)]
pub struct InvoiceService {
    db: SqlitePool,
}

/// Invoice with the details of the billed appointment
#[derive(Debug, Clone, Serialize)]
pub struct Invoice {
    pub id: i64,
    pub appointment_id: i64,
    pub client_name: Option<String>,
    pub service_name: Option<String>,
    pub scheduled_at: Option<NaiveDateTime>,
    pub total: Decimal,
    pub status: InvoiceStatus,
    pub issued_at: NaiveDateTime,
}

#[derive(Debug, FromRow)]
struct InvoiceRow {
    id: i64,
    appointment_id: i64,
    client_name: Option<String>,
    service_name: Option<String>,
    scheduled_at: Option<NaiveDateTime>,
    total_cents: i64,
    status: InvoiceStatus,
    issued_at: NaiveDateTime,
}

impl From<InvoiceRow> for Invoice {
    fn from(row: InvoiceRow) -> Self {
        Self {
            id: row.id,
            appointment_id: row.appointment_id,
            client_name: row.client_name,
            service_name: row.service_name,
            scheduled_at: row.scheduled_at,
            total: from_cents(row.total_cents),
            status: row.status,
            issued_at: row.issued_at,
        }
    }
}

const INVOICE_SELECT: &str = r#"
    SELECT i.id, i.appointment_id, c.name AS client_name, s.name AS service_name,
           a.scheduled_at, i.total_cents, i.status, i.issued_at
    FROM invoices i
    LEFT JOIN appointments a ON a.id = i.appointment_id
    LEFT JOIN clients c ON c.id = a.client_id
    LEFT JOIN services s ON s.id = a.service_id
"#;

impl InvoiceService {
    /// Create a new InvoiceService instance
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// List invoices, most recently issued first
    pub async fn list_invoices(&self) -> AppResult<Vec<Invoice>> {
        let rows = sqlx::query_as::<_, InvoiceRow>(&format!(
            "{INVOICE_SELECT} ORDER BY i.issued_at DESC, i.id DESC"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Invoice::from).collect())
    }

    pub async fn get_invoice(&self, invoice_id: i64) -> AppResult<Invoice> {
        let row = sqlx::query_as::<_, InvoiceRow>(&format!("{INVOICE_SELECT} WHERE i.id = ?"))
            .bind(invoice_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Invoice"))?;

        Ok(row.into())
    }

    /// Issue an invoice; the total defaults to the appointment's price
    pub async fn create_invoice(&self, input: InvoiceInput) -> AppResult<Invoice> {
        let draft = validate_invoice(input)?;
        let total_cents = self.resolve_total(&draft).await?;

        let invoice_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO invoices (appointment_id, total_cents, status)
            VALUES (?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(draft.appointment_id)
        .bind(total_cents)
        .bind(draft.status)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(
            invoice_id,
            appointment_id = draft.appointment_id,
            total = %from_cents(total_cents),
            "Invoice issued"
        );

        self.get_invoice(invoice_id).await
    }

    /// Update an invoice; absent fields keep their stored value
    pub async fn update_invoice(&self, invoice_id: i64, input: InvoiceInput) -> AppResult<Invoice> {
        let existing = self.get_invoice(invoice_id).await?;

        let draft = validate_invoice(InvoiceInput {
            appointment_id: merge(input.appointment_id, Some(existing.appointment_id)),
            total: merge(input.total, Some(existing.total)),
            status: merge(input.status, Some(existing.status.as_str().to_string())),
        })?;
        let total_cents = self.resolve_total(&draft).await?;

        sqlx::query(
            "UPDATE invoices SET appointment_id = ?, total_cents = ?, status = ? WHERE id = ?",
        )
        .bind(draft.appointment_id)
        .bind(total_cents)
        .bind(draft.status)
        .bind(invoice_id)
        .execute(&self.db)
        .await?;

        self.get_invoice(invoice_id).await
    }

    pub async fn delete_invoice(&self, invoice_id: i64) -> AppResult<()> {
        if !record_exists(&self.db, "invoices", invoice_id).await? {
            return Err(AppError::not_found("Invoice"));
        }

        sqlx::query("DELETE FROM invoices WHERE id = ?")
            .bind(invoice_id)
            .execute(&self.db)
            .await?;

        Ok(())
    }

    async fn resolve_total(&self, draft: &InvoiceDraft) -> AppResult<i64> {
        let appointment_price: i64 =
            sqlx::query_scalar("SELECT price_cents FROM appointments WHERE id = ?")
                .bind(draft.appointment_id)
                .fetch_optional(&self.db)
                .await?
                .ok_or_else(|| AppError::not_found("Appointment"))?;

        Ok(draft.total_cents.unwrap_or(appointment_price))
    }
}
