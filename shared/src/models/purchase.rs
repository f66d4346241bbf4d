//! Supplier purchase models

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How a purchase was paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Especes,
    #[default]
    Carte,
    Virement,
    Cheque,
    Autre,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 5] = [
        PaymentMethod::Especes,
        PaymentMethod::Carte,
        PaymentMethod::Virement,
        PaymentMethod::Cheque,
        PaymentMethod::Autre,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Especes => "especes",
            PaymentMethod::Carte => "carte",
            PaymentMethod::Virement => "virement",
            PaymentMethod::Cheque => "cheque",
            PaymentMethod::Autre => "autre",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == s)
    }
}

/// Raw purchase payload, as received from a client
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PurchaseInput {
    pub supplier_id: Option<i64>,
    pub purchase_date: Option<String>,
    pub payment_method: Option<String>,
    pub invoice_reference: Option<String>,
    pub notes: Option<String>,
    pub items: Option<Vec<PurchaseItemInput>>,
}

/// Raw purchase line payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PurchaseItemInput {
    pub product_id: Option<i64>,
    pub quantity: Option<i64>,
    pub unit_price: Option<Decimal>,
}

/// One validated purchase line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurchaseLine {
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price_cents: i64,
}

impl PurchaseLine {
    /// quantity × unit price. Validation guarantees this does not overflow.
    pub fn subtotal_cents(&self) -> i64 {
        self.quantity * self.unit_price_cents
    }
}

/// A validated purchase, ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseDraft {
    pub supplier_id: i64,
    pub purchase_date: NaiveDate,
    pub payment_method: PaymentMethod,
    pub invoice_reference: Option<String>,
    pub notes: Option<String>,
    /// Never empty
    pub items: Vec<PurchaseLine>,
}

impl PurchaseDraft {
    /// Sum of the line subtotals
    pub fn total_cents(&self) -> i64 {
        self.items.iter().map(PurchaseLine::subtotal_cents).sum()
    }

    /// Distinct products referenced by the lines, in ascending id order
    pub fn product_ids(&self) -> Vec<i64> {
        let ids: BTreeSet<i64> = self.items.iter().map(|item| item.product_id).collect();
        ids.into_iter().collect()
    }
}

/// Net stock increase per product caused by `lines`, or `None` when the
/// combined quantity of a product does not fit in an `i64`
pub fn stock_deltas(lines: &[PurchaseLine]) -> Option<BTreeMap<i64, i64>> {
    let mut deltas: BTreeMap<i64, i64> = BTreeMap::new();
    for line in lines {
        let delta = deltas.entry(line.product_id).or_insert(0);
        *delta = delta.checked_add(line.quantity)?;
    }
    Some(deltas)
}
