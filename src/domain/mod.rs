pub mod account;
pub mod bill;
pub mod reading;
pub mod repositories;
pub mod tariff;

// Re-export commonly used types
pub use account::{Account, AccountRepository, ConnectionStatus};
pub use bill::{Bill, BillDraft, BillRepository, BillStatus, BillingPeriod};
pub use reading::{MeterReading, NewReading, ReadingRepository, SubmissionChannel};
pub use repositories::{DomainResult, RepositoryProvider};
pub use tariff::{
    Department, Jurisdiction, TariffCategory, TariffRepository, TariffScope, TariffSet, TariffSlab,
};

// Re-export DomainError from support for convenience
pub use crate::support::errors::{DomainError, ErrorKind};
