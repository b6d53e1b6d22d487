pub mod errors;
pub mod money;
pub mod shutdown;
