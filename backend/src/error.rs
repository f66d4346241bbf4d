//! Error handling for the Salon Manager
//!
//! Every failure leaves the API in the same envelope:
//! `{"error": {"code": ..., "message": ..., "details": ...}}`

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::FieldErrors;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Client-supplied data failed validation; one message per field
    #[error("Validation error: {0}")]
    Validation(#[from] FieldErrors),

    /// A referenced resource does not exist. Holds the resource kind.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The operation would break a reference held by other rows
    #[error("Conflict: {message}")]
    Conflict { resource: String, message: String },

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    // Internal errors
    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    /// Shorthand for a single-field validation failure
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation(FieldErrors::single(field, message))
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        AppError::NotFound(resource.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::DatabaseError(_)
            | AppError::MigrationError(_)
            | AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<FieldErrors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Internals are logged, never returned
        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }

        let error_detail = match self {
            AppError::Validation(fields) => ErrorDetail {
                code: "VALIDATION_ERROR".to_string(),
                message: "La validation a échoué".to_string(),
                details: Some(fields),
                resource: None,
            },
            AppError::NotFound(resource) => ErrorDetail {
                code: "NOT_FOUND".to_string(),
                message: format!("{} not found", resource),
                details: None,
                resource: Some(resource),
            },
            AppError::Conflict { resource, message } => ErrorDetail {
                code: "CONFLICT".to_string(),
                message,
                details: None,
                resource: Some(resource),
            },
            AppError::DatabaseError(_) | AppError::MigrationError(_) => ErrorDetail {
                code: "DATABASE_ERROR".to_string(),
                message: "A database error occurred".to_string(),
                details: None,
                resource: None,
            },
            AppError::InternalError(_) => ErrorDetail {
                code: "INTERNAL_ERROR".to_string(),
                message: "An internal server error occurred".to_string(),
                details: None,
                resource: None,
            },
        };

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::field("items", "Au moins un produit est requis").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::not_found("Purchase").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Conflict {
                resource: "Product".into(),
                message: "in use".into()
            }
            .status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::DatabaseError(sqlx::Error::RowNotFound).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_message_names_resource() {
        let err = AppError::not_found("Supplier");
        assert_eq!(err.to_string(), "Resource not found: Supplier");
    }
}
