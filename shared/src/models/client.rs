//! Client models

use serde::Deserialize;

/// Raw client payload. On update, absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientInput {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
}

/// A validated client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientDraft {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub notes: Option<String>,
}
