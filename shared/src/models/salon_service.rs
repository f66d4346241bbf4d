//! Salon service (price list) models

use rust_decimal::Decimal;
use serde::Deserialize;

/// Raw salon service payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SalonServiceInput {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub duration_minutes: Option<i64>,
}

/// A validated salon service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalonServiceDraft {
    pub name: String,
    pub price_cents: i64,
    pub duration_minutes: i64,
}
