//! HTTP REST API interfaces
//!
//! - `common`: response envelope, error mapping and validated JSON extractor
//! - `modules`: handlers and DTOs per resource, plus metrics and request ids
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod modules;
pub mod router;

pub use router::create_api_router;
