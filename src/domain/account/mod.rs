//! Account aggregate

pub mod model;
pub mod repository;

pub use model::{Account, ConnectionStatus};
pub use repository::AccountRepository;
