//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod account_repository;
pub mod bill_repository;
pub mod reading_repository;
pub mod repository_provider;
pub mod tariff_repository;

pub use account_repository::SeaOrmAccountRepository;
pub use bill_repository::SeaOrmBillRepository;
pub use reading_repository::SeaOrmReadingRepository;
pub use repository_provider::SeaOrmRepositoryProvider;
pub use tariff_repository::SeaOrmTariffRepository;

use rust_decimal::Decimal;

use crate::domain::{DomainError, DomainResult};
use crate::support::money;

/// Scale a domain decimal into its integer column representation.
pub(crate) fn to_column(value: Decimal, scale: u32, field: &str) -> DomainResult<i64> {
    money::to_scaled(value, scale).ok_or_else(|| {
        DomainError::Validation(format!("{} value {} is out of range", field, value))
    })
}
