//! Appointment service

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;
use shared::money::from_cents;
use shared::{validate_appointment, AppointmentDraft, AppointmentInput};
use sqlx::{FromRow, SqlitePool};

use crate::error::{AppError, AppResult};
use crate::services::{ensure_unreferenced, merge, record_exists};

/// Appointment service for the salon's booking calendar
#[derive(Clone)]
pub struct AppointmentService {
    db: SqlitePool,
}

/// Appointment with its client and service details
#[derive(Debug, Clone, Serialize)]
pub struct Appointment {
    pub id: i64,
    pub client_id: i64,
    pub client_name: Option<String>,
    pub service_id: i64,
    pub service_name: Option<String>,
    pub duration_minutes: Option<i64>,
    pub scheduled_at: NaiveDateTime,
    pub price: Decimal,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, FromRow)]
struct AppointmentRow {
    id: i64,
    client_id: i64,
    client_name: Option<String>,
    service_id: i64,
    service_name: Option<String>,
    duration_minutes: Option<i64>,
    scheduled_at: NaiveDateTime,
    price_cents: i64,
    notes: Option<String>,
    created_at: NaiveDateTime,
}

impl From<AppointmentRow> for Appointment {
    fn from(row: AppointmentRow) -> Self {
        Self {
            id: row.id,
            client_id: row.client_id,
            client_name: row.client_name,
            service_id: row.service_id,
            service_name: row.service_name,
            duration_minutes: row.duration_minutes,
            scheduled_at: row.scheduled_at,
            price: from_cents(row.price_cents),
            notes: row.notes,
            created_at: row.created_at,
        }
    }
}

const APPOINTMENT_SELECT: &str = r#"
    SELECT a.id, a.client_id, c.name AS client_name, a.service_id, s.name AS service_name,
           s.duration_minutes, a.scheduled_at, a.price_cents, a.notes, a.created_at
    FROM appointments a
    LEFT JOIN clients c ON c.id = a.client_id
    LEFT JOIN services s ON s.id = a.service_id
"#;

impl AppointmentService {
    /// Create a new AppointmentService instance
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// List appointments, latest slot first
    pub async fn list_appointments(&self) -> AppResult<Vec<Appointment>> {
        let rows = sqlx::query_as::<_, AppointmentRow>(&format!(
            "{APPOINTMENT_SELECT} ORDER BY a.scheduled_at DESC, a.id DESC"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Appointment::from).collect())
    }

    /// Get an appointment by ID
    pub async fn get_appointment(&self, appointment_id: i64) -> AppResult<Appointment> {
        let row = sqlx::query_as::<_, AppointmentRow>(&format!(
            "{APPOINTMENT_SELECT} WHERE a.id = ?"
        ))
        .bind(appointment_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::not_found("Appointment"))?;

        Ok(row.into())
    }

    /// Book an appointment; the price defaults to the service's price
    pub async fn create_appointment(&self, input: AppointmentInput) -> AppResult<Appointment> {
        let draft = validate_appointment(input)?;
        let price_cents = self.resolve_price(&draft).await?;

        let appointment_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO appointments (client_id, service_id, scheduled_at, price_cents, notes)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(draft.client_id)
        .bind(draft.service_id)
        .bind(draft.scheduled_at)
        .bind(price_cents)
        .bind(&draft.notes)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(
            appointment_id,
            client_id = draft.client_id,
            service_id = draft.service_id,
            "Appointment booked"
        );

        self.get_appointment(appointment_id).await
    }

    /// Update an appointment; absent fields keep their stored value
    pub async fn update_appointment(
        &self,
        appointment_id: i64,
        input: AppointmentInput,
    ) -> AppResult<Appointment> {
        let existing = self.get_appointment(appointment_id).await?;

        let draft = validate_appointment(AppointmentInput {
            client_id: merge(input.client_id, Some(existing.client_id)),
            service_id: merge(input.service_id, Some(existing.service_id)),
            scheduled_at: merge(
                input.scheduled_at,
                Some(existing.scheduled_at.format("%Y-%m-%dT%H:%M:%S%.f").to_string()),
            ),
            price: merge(input.price, Some(existing.price)),
            notes: merge(input.notes, existing.notes),
        })?;
        let price_cents = self.resolve_price(&draft).await?;

        sqlx::query(
            r#"
            UPDATE appointments
            SET client_id = ?, service_id = ?, scheduled_at = ?, price_cents = ?, notes = ?
            WHERE id = ?
            "#,
        )
        .bind(draft.client_id)
        .bind(draft.service_id)
        .bind(draft.scheduled_at)
        .bind(price_cents)
        .bind(&draft.notes)
        .bind(appointment_id)
        .execute(&self.db)
        .await?;

        self.get_appointment(appointment_id).await
    }

    /// Cancel an appointment that has not been invoiced
    pub async fn delete_appointment(&self, appointment_id: i64) -> AppResult<()> {
        if !record_exists(&self.db, "appointments", appointment_id).await? {
            return Err(AppError::not_found("Appointment"));
        }

        ensure_unreferenced(
            &self.db,
            "Appointment",
            "invoices",
            "appointment_id",
            appointment_id,
            "Ce rendez-vous a été facturé et ne peut pas être supprimé",
        )
        .await?;

        sqlx::query("DELETE FROM appointments WHERE id = ?")
            .bind(appointment_id)
            .execute(&self.db)
            .await?;

        Ok(())
    }

    /// Check the client and service exist and settle the price
    async fn resolve_price(&self, draft: &AppointmentDraft) -> AppResult<i64> {
        if !record_exists(&self.db, "clients", draft.client_id).await? {
            return Err(AppError::not_found("Client"));
        }

        let service_price: i64 =
            sqlx::query_scalar("SELECT price_cents FROM services WHERE id = ?")
                .bind(draft.service_id)
                .fetch_optional(&self.db)
                .await?
                .ok_or_else(|| AppError::not_found("Service"))?;

        Ok(draft.price_cents.unwrap_or(service_price))
    }
}
