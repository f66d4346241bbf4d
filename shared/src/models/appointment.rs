//! Appointment models

use chrono::{DateTime, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Deserialize;

/// Raw appointment payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppointmentInput {
    pub client_id: Option<i64>,
    pub service_id: Option<i64>,
    pub scheduled_at: Option<String>,
    /// Defaults to the service's price when absent
    pub price: Option<Decimal>,
    pub notes: Option<String>,
}

/// A validated appointment. `price_cents` is resolved against the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentDraft {
    pub client_id: i64,
    pub service_id: i64,
    pub scheduled_at: NaiveDateTime,
    pub price_cents: Option<i64>,
    pub notes: Option<String>,
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse the date-time forms browsers and clients send
///
/// RFC 3339 values are converted to UTC; naive values are taken as-is.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}
