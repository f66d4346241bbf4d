//! HTTP handlers, one module per resource

pub mod appointment;
pub mod catalog;
pub mod client;
pub mod health;
pub mod invoice;
pub mod product;
pub mod purchase;
pub mod stats;
pub mod supplier;

pub use appointment::*;
pub use catalog::*;
pub use client::*;
pub use health::*;
pub use invoice::*;
pub use product::*;
pub use purchase::*;
pub use stats::*;
pub use supplier::*;
