//! Supplier models

use serde::Deserialize;

/// Raw supplier payload. On update, absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SupplierInput {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
}

/// A validated supplier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplierDraft {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
}
