//! Meter reading aggregate

pub mod model;
pub mod repository;

pub use model::{MeterReading, NewReading, SubmissionChannel};
pub use repository::ReadingRepository;
