//! Tariff aggregate
//!
//! Tariff sets scoped by jurisdiction, department and category, with their
//! ordered rate slabs.

pub mod model;
pub mod repository;

pub use model::{Department, Jurisdiction, TariffCategory, TariffScope, TariffSet, TariffSlab};
pub use repository::TariffRepository;
