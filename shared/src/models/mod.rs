//! Domain models for the Salon Manager

mod appointment;
mod client;
mod invoice;
mod product;
mod purchase;
mod salon_service;
mod supplier;

pub use appointment::*;
pub use client::*;
pub use invoice::*;
pub use product::*;
pub use purchase::*;
pub use salon_service::*;
pub use supplier::*;
