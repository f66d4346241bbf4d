//! Catalog service: the salon's price list of treatments

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;
use shared::money::from_cents;
use shared::{validate_salon_service, SalonServiceInput};
use sqlx::{FromRow, SqlitePool};

use crate::error::{AppError, AppResult};
use crate::services::{ensure_unreferenced, merge, record_exists};

#[derive(Clone)]
pub struct CatalogService {
    db: SqlitePool,
}

/// A treatment offered by the salon
#[derive(Debug, Clone, Serialize)]
pub struct SalonService {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    pub duration_minutes: i64,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, FromRow)]
struct SalonServiceRow {
    id: i64,
    name: String,
    price_cents: i64,
    duration_minutes: i64,
    created_at: NaiveDateTime,
}

impl From<SalonServiceRow> for SalonService {
    fn from(row: SalonServiceRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            price: from_cents(row.price_cents),
            duration_minutes: row.duration_minutes,
            created_at: row.created_at,
        }
    }
}

impl CatalogService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// List services by name
    pub async fn list_services(&self) -> AppResult<Vec<SalonService>> {
        let rows = sqlx::query_as::<_, SalonServiceRow>(
            "SELECT id, name, price_cents, duration_minutes, created_at FROM services ORDER BY name, id",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(SalonService::from).collect())
    }

    pub async fn get_service(&self, service_id: i64) -> AppResult<SalonService> {
        let row = sqlx::query_as::<_, SalonServiceRow>(
            "SELECT id, name, price_cents, duration_minutes, created_at FROM services WHERE id = ?",
        )
        .bind(service_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::not_found("Service"))?;

        Ok(row.into())
    }

    pub async fn create_service(&self, input: SalonServiceInput) -> AppResult<SalonService> {
        let draft = validate_salon_service(input)?;

        let row = sqlx::query_as::<_, SalonServiceRow>(
            r#"
            INSERT INTO services (name, price_cents, duration_minutes)
            VALUES (?, ?, ?)
            RETURNING id, name, price_cents, duration_minutes, created_at
            "#,
        )
        .bind(&draft.name)
        .bind(draft.price_cents)
        .bind(draft.duration_minutes)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(service_id = row.id, "Service created");

        Ok(row.into())
    }

    /// Update a service; absent fields keep their stored value
    pub async fn update_service(
        &self,
        service_id: i64,
        input: SalonServiceInput,
    ) -> AppResult<SalonService> {
        let existing = self.get_service(service_id).await?;

        let draft = validate_salon_service(SalonServiceInput {
            name: merge(input.name, Some(existing.name)),
            price: merge(input.price, Some(existing.price)),
            duration_minutes: merge(input.duration_minutes, Some(existing.duration_minutes)),
        })?;

        let row = sqlx::query_as::<_, SalonServiceRow>(
            r#"
            UPDATE services
            SET name = ?, price_cents = ?, duration_minutes = ?
            WHERE id = ?
            RETURNING id, name, price_cents, duration_minutes, created_at
            "#,
        )
        .bind(&draft.name)
        .bind(draft.price_cents)
        .bind(draft.duration_minutes)
        .bind(service_id)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Delete a service no appointment uses
    pub async fn delete_service(&self, service_id: i64) -> AppResult<()> {
        if !record_exists(&self.db, "services", service_id).await? {
            return Err(AppError::not_found("Service"));
        }

        ensure_unreferenced(
            &self.db,
            "Service",
            "appointments",
            "service_id",
            service_id,
            "Cette prestation est utilisée par des rendez-vous et ne peut pas être supprimée",
        )
        .await?;

        sqlx::query("DELETE FROM services WHERE id = ?")
            .bind(service_id)
            .execute(&self.db)
            .await?;

        Ok(())
    }
}
