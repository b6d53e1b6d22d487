//! Bill lookup and the payment status hook

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
