//! Product inventory models

use std::ops::RangeInclusive;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Alert threshold applied when a product is created without one
pub const DEFAULT_ALERT_THRESHOLD: i64 = 5;

/// Unit label applied when a product is created without one
pub const DEFAULT_UNIT: &str = "unité";

/// Product categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum ProductCategory {
    Coloration,
    Soin,
    Revente,
    Equipement,
    Autre,
}

impl ProductCategory {
    pub const ALL: [ProductCategory; 5] = [
        ProductCategory::Coloration,
        ProductCategory::Soin,
        ProductCategory::Revente,
        ProductCategory::Equipement,
        ProductCategory::Autre,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Coloration => "coloration",
            ProductCategory::Soin => "soin",
            ProductCategory::Revente => "revente",
            ProductCategory::Equipement => "equipement",
            ProductCategory::Autre => "autre",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

/// Derived inventory level of a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    /// Above the alert threshold
    Ok,
    /// At or below the alert threshold, but still in stock
    Alerte,
    /// Nothing left
    Rupture,
}

impl StockStatus {
    /// Classify a stock level against its alert threshold
    pub fn classify(stock_quantity: i64, alert_threshold: i64) -> Self {
        if stock_quantity <= 0 {
            StockStatus::Rupture
        } else if stock_quantity <= alert_threshold {
            StockStatus::Alerte
        } else {
            StockStatus::Ok
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::Ok => "ok",
            StockStatus::Alerte => "alerte",
            StockStatus::Rupture => "rupture",
        }
    }
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw product payload, as received from a client
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductInput {
    pub name: Option<String>,
    pub category: Option<String>,
    pub supplier_id: Option<i64>,
    pub purchase_price: Option<Decimal>,
    pub sale_price: Option<Decimal>,
    pub stock_quantity: Option<i64>,
    pub alert_threshold: Option<i64>,
    pub unit: Option<String>,
    pub notes: Option<String>,
}

/// A validated product, ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub category: ProductCategory,
    pub supplier_id: Option<i64>,
    pub purchase_price_cents: i64,
    pub sale_price_cents: Option<i64>,
    pub stock_quantity: i64,
    pub alert_threshold: i64,
    pub unit: String,
    pub notes: Option<String>,
}

/// Raw stock adjustment payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StockAdjustmentInput {
    /// Signed change to apply to the current stock
    pub quantity: Option<i64>,
    pub reason: Option<String>,
}

/// A validated stock adjustment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockAdjustmentDraft {
    pub delta: i64,
    pub reason: Option<String>,
}

/// Current stock levels from which applying `delta` lands in `0..=i64::MAX`.
/// `None` when no level qualifies.
pub fn adjustable_range(delta: i64) -> Option<RangeInclusive<i64>> {
    let lowest = delta.checked_neg()?;
    let highest = if delta > 0 { i64::MAX - delta } else { i64::MAX };
    Some(lowest..=highest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_rupture() {
        assert_eq!(StockStatus::classify(0, 5), StockStatus::Rupture);
        assert_eq!(StockStatus::classify(-3, 5), StockStatus::Rupture);
        assert_eq!(StockStatus::classify(0, 0), StockStatus::Rupture);
    }

    #[test]
    fn test_classify_alerte_at_threshold() {
        assert_eq!(StockStatus::classify(5, 5), StockStatus::Alerte);
        assert_eq!(StockStatus::classify(1, 5), StockStatus::Alerte);
    }

    #[test]
    fn test_classify_ok_above_threshold() {
        assert_eq!(StockStatus::classify(6, 5), StockStatus::Ok);
        assert_eq!(StockStatus::classify(1, 0), StockStatus::Ok);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&StockStatus::Alerte).unwrap(), "\"alerte\"");
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(ProductCategory::parse("soin"), Some(ProductCategory::Soin));
        assert_eq!(ProductCategory::parse("Soin"), None);
        assert_eq!(ProductCategory::parse("shampoing"), None);
    }

    #[test]
    fn test_adjustable_range_bounds() {
        assert_eq!(adjustable_range(-5), Some(5..=i64::MAX));
        assert_eq!(adjustable_range(3), Some(-3..=i64::MAX - 3));
        assert_eq!(adjustable_range(i64::MAX), Some(-i64::MAX..=0));
        assert_eq!(adjustable_range(i64::MIN), None);
    }

    #[test]
    fn test_adjustable_range_excludes_overflow() {
        let range = adjustable_range(1).unwrap();
        assert!(range.contains(&(i64::MAX - 1)));
        assert!(!range.contains(&i64::MAX));
    }
}
