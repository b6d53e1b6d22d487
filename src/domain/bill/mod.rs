//! Bill aggregate

pub mod model;
pub mod repository;

pub use model::{Bill, BillDraft, BillStatus, BillingPeriod};
pub use repository::BillRepository;
