//! Invoice models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Payment status of an invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Paid,
    #[default]
    Unpaid,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Unpaid => "unpaid",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "paid" => Some(InvoiceStatus::Paid),
            "unpaid" => Some(InvoiceStatus::Unpaid),
            _ => None,
        }
    }
}

/// Raw invoice payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvoiceInput {
    pub appointment_id: Option<i64>,
    /// Defaults to the appointment's price when absent
    pub total: Option<Decimal>,
    pub status: Option<String>,
}

/// A validated invoice. `total_cents` is resolved against the appointment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceDraft {
    pub appointment_id: i64,
    pub total_cents: Option<i64>,
    pub status: InvoiceStatus,
}
