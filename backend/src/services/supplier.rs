//! Supplier service

use chrono::NaiveDateTime;
use serde::Serialize;
use shared::{validate_supplier, SupplierInput};
use sqlx::{FromRow, SqlitePool};

use crate::error::{AppError, AppResult};
use crate::services::{ensure_unreferenced, merge, record_exists};

/// Supplier service for managing the salon's suppliers
#[derive(Clone)]
pub struct SupplierService {
    db: SqlitePool,
}

/// Supplier information
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Supplier {
    pub id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

impl SupplierService {
    /// Create a new SupplierService instance
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// List suppliers by name
    pub async fn list_suppliers(&self) -> AppResult<Vec<Supplier>> {
        let suppliers = sqlx::query_as::<_, Supplier>(
            "SELECT id, name, phone, email, notes, created_at FROM suppliers ORDER BY name, id",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(suppliers)
    }

    /// Get a supplier by ID
    pub async fn get_supplier(&self, supplier_id: i64) -> AppResult<Supplier> {
        sqlx::query_as::<_, Supplier>(
            "SELECT id, name, phone, email, notes, created_at FROM suppliers WHERE id = ?",
        )
        .bind(supplier_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::not_found("Supplier"))
    }

    /// Create a supplier
    pub async fn create_supplier(&self, input: SupplierInput) -> AppResult<Supplier> {
        let draft = validate_supplier(input)?;

        let supplier = sqlx::query_as::<_, Supplier>(
            r#"
            INSERT INTO suppliers (name, phone, email, notes)
            VALUES (?, ?, ?, ?)
            RETURNING id, name, phone, email, notes, created_at
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.phone)
        .bind(&draft.email)
        .bind(&draft.notes)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(supplier_id = supplier.id, "Supplier created");

        Ok(supplier)
    }

    /// Update a supplier; absent fields keep their stored value
    pub async fn update_supplier(
        &self,
        supplier_id: i64,
        input: SupplierInput,
    ) -> AppResult<Supplier> {
        let existing = self.get_supplier(supplier_id).await?;

        let draft = validate_supplier(SupplierInput {
            name: merge(input.name, Some(existing.name)),
            phone: merge(input.phone, existing.phone),
            email: merge(input.email, existing.email),
            notes: merge(input.notes, existing.notes),
        })?;

        let supplier = sqlx::query_as::<_, Supplier>(
            r#"
            UPDATE suppliers
            SET name = ?, phone = ?, email = ?, notes = ?
            WHERE id = ?
            RETURNING id, name, phone, email, notes, created_at
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.phone)
        .bind(&draft.email)
        .bind(&draft.notes)
        .bind(supplier_id)
        .fetch_one(&self.db)
        .await?;

        Ok(supplier)
    }

    /// Delete a supplier without purchases
    ///
    /// Products pointing at the supplier keep existing with no supplier.
    pub async fn delete_supplier(&self, supplier_id: i64) -> AppResult<()> {
        if !record_exists(&self.db, "suppliers", supplier_id).await? {
            return Err(AppError::not_found("Supplier"));
        }

        ensure_unreferenced(
            &self.db,
            "Supplier",
            "purchases",
            "supplier_id",
            supplier_id,
            "Ce fournisseur a des achats enregistrés et ne peut pas être supprimé",
        )
        .await?;

        sqlx::query("DELETE FROM suppliers WHERE id = ?")
            .bind(supplier_id)
            .execute(&self.db)
            .await?;

        tracing::info!(supplier_id, "Supplier deleted");

        Ok(())
    }
}
