//! Client service

use chrono::NaiveDateTime;
use serde::Serialize;
use shared::{validate_client, ClientInput};
use sqlx::{FromRow, SqlitePool};

use crate::error::{AppError, AppResult};
use crate::services::{ensure_unreferenced, merge, record_exists};

#[derive(Clone)]
pub struct ClientService {
    db: SqlitePool,
}

/// Salon client
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

impl ClientService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// List clients, newest first
    pub async fn list_clients(&self) -> AppResult<Vec<Client>> {
        let clients = sqlx::query_as::<_, Client>(
            "SELECT id, name, phone, email, notes, created_at FROM clients ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(clients)
    }

    pub async fn get_client(&self, client_id: i64) -> AppResult<Client> {
        sqlx::query_as::<_, Client>(
            "SELECT id, name, phone, email, notes, created_at FROM clients WHERE id = ?",
        )
        .bind(client_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::not_found("Client"))
    }

    pub async fn create_client(&self, input: ClientInput) -> AppResult<Client> {
        let draft = validate_client(input)?;

        let client = sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (name, phone, email, notes)
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

        tracing::info!(client_id = client.id, "Client created");

        Ok(client)
    }

    /// Update a client; absent fields keep their stored value
    pub async fn update_client(&self, client_id: i64, input: ClientInput) -> AppResult<Client> {
        let existing = self.get_client(client_id).await?;

        let draft = validate_client(ClientInput {
            name: merge(input.name, Some(existing.name)),
            phone: merge(input.phone, Some(existing.phone)),
            email: merge(input.email, existing.email),
            notes: merge(input.notes, existing.notes),
        })?;

        let client = sqlx::query_as::<_, Client>(
            r#"
            UPDATE clients
            SET name = ?, phone = ?, email = ?, notes = ?
            WHERE id = ?
            RETURNING id, name, phone, email, notes, created_at
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.phone)
        .bind(&draft.email)
        .bind(&draft.notes)
        .bind(client_id)
        .fetch_one(&self.db)
        .await?;

        Ok(client)
    }

    /// Delete a client with no appointments
    pub async fn delete_client(&self, client_id: i64) -> AppResult<()> {
        if !record_exists(&self.db, "clients", client_id).await? {
            return Err(AppError::not_found("Client"));
        }

        ensure_unreferenced(
            &self.db,
            "Client",
            "appointments",
            "client_id",
            client_id,
            "Ce client a des rendez-vous et ne peut pas être supprimé",
        )
        .await?;

        sqlx::query("DELETE FROM clients WHERE id = ?")
            .bind(client_id)
            .execute(&self.db)
            .await?;

        Ok(())
    }
}
