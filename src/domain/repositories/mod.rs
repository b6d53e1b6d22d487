//! Repository access for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: unified access to all per-aggregate repositories
//! - `DomainResult`: standard result type for domain operations

use async_trait::async_trait;

use super::account::AccountRepository;
use super::bill::{Bill, BillDraft, BillRepository};
use super::reading::{MeterReading, NewReading, ReadingRepository};
use super::tariff::TariffRepository;
use crate::support::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Provides access to all domain repositories.
///
/// Injected into every component as `Arc<dyn RepositoryProvider>`;
/// consumers request only the repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let account = repos.accounts().find_by_id(7).await?;
///     let bills = repos.bills().find_by_account(7).await?;
/// }
/// ```
#[async_trait]
pub trait RepositoryProvider: Send + Sync {
    fn accounts(&self) -> &dyn AccountRepository;
    fn tariffs(&self) -> &dyn TariffRepository;
    fn readings(&self) -> &dyn ReadingRepository;
    fn bills(&self) -> &dyn BillRepository;

    /// Upsert the period's bill and record the reading that produced it as
    /// one unit: both are stored or neither is. The stored reading's
    /// `bill_id` points at the upserted bill.
    async fn record_submission(
        &self,
        bill: BillDraft,
        reading: NewReading,
    ) -> DomainResult<(Bill, MeterReading)>;

    /// Cheap round trip proving the store is reachable.
    async fn ping(&self) -> DomainResult<()>;
}
