//! Shared types and models for the Salon Manager
//!
//! This crate contains the pure domain layer used by the backend: enumerations,
//! stock status derivation, money conversions and the request validators that
//! turn raw payloads into typed drafts. Nothing in here performs I/O.

pub mod models;
pub mod money;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
