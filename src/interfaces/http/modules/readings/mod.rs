//! Meter reading submission and history

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
