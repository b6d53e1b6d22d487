//! # Utility Billing
//!
//! Slab-based billing engine for electricity, gas and water accounts.
//! A meter reading is validated, priced against the tariff configured for
//! the account's jurisdiction, department and category, and turned into
//! the single bill of its billing month.
//!
//! ## Architecture
//!
//! - **domain**: accounts, tariffs, readings, bills and the repository traits
//! - **application**: reading validation, tariff resolution, charge
//!   calculation, bill lifecycle and submission orchestration
//! - **infrastructure**: SeaORM persistence and in-memory repositories
//! - **interfaces**: REST API with Swagger documentation
//! - **server**: runtime wiring shared by the CLI binary
//! - **support**: error kinds, money scaling and shutdown plumbing

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod support;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{
    init_database, run_migrations, DatabaseConfig, InMemoryRepositoryProvider,
    SeaOrmRepositoryProvider,
};

// Re-export API router
pub use interfaces::http::create_api_router;
