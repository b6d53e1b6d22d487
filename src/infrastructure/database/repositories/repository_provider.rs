//! SeaORM implementation of RepositoryProvider

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set, TransactionTrait};
use tracing::debug;

use crate::domain::{
    AccountRepository, Bill, BillDraft, BillRepository, DomainError, DomainResult, MeterReading,
    NewReading, ReadingRepository, RepositoryProvider, TariffRepository,
};

use super::account_repository::SeaOrmAccountRepository;
use super::bill_repository::{self, SeaOrmBillRepository};
use super::reading_repository::{self, SeaOrmReadingRepository};
use super::tariff_repository::SeaOrmTariffRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let account = repos.accounts().find_by_id(7).await?;
/// let bill = repos.bills().find_by_period(7, period).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    db: DatabaseConnection,
    accounts: SeaOrmAccountRepository,
    tariffs: SeaOrmTariffRepository,
    readings: SeaOrmReadingRepository,
    bills: SeaOrmBillRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            accounts: SeaOrmAccountRepository::new(db.clone()),
            tariffs: SeaOrmTariffRepository::new(db.clone()),
            readings: SeaOrmReadingRepository::new(db.clone()),
            bills: SeaOrmBillRepository::new(db.clone()),
            db,
        }
    }

    /// Concrete account repository, for registry sync.
    pub fn account_store(&self) -> &SeaOrmAccountRepository {
        &self.accounts
    }

    /// Concrete tariff repository, for tariff administration.
    pub fn tariff_store(&self) -> &SeaOrmTariffRepository {
        &self.tariffs
    }
}

#[async_trait]
impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn accounts(&self) -> &dyn AccountRepository {
        &self.accounts
    }

    fn tariffs(&self) -> &dyn TariffRepository {
        &self.tariffs
    }

    fn readings(&self) -> &dyn ReadingRepository {
        &self.readings
    }

    fn bills(&self) -> &dyn BillRepository {
        &self.bills
    }

    async fn ping(&self) -> DomainResult<()> {
        self.db
            .ping()
            .await
            .map_err(|e| DomainError::StoreUnavailable(e.to_string()))
    }

    async fn record_submission(
        &self,
        bill: BillDraft,
        reading: NewReading,
    ) -> DomainResult<(Bill, MeterReading)> {
        let (account_id, period) = (bill.account_id, bill.period);
        let bill_model = bill_repository::active_model(bill)?;
        let mut reading_model = reading_repository::active_model(reading)?;

        let txn = self.db.begin().await?;
        let row = bill_repository::upsert_row(&txn, bill_model, account_id, period).await?;
        reading_model.bill_id = Set(Some(row.id));
        let saved = reading_model.insert(&txn).await?;
        txn.commit().await?;

        debug!(bill_id = row.id, reading_id = saved.id, "Submission committed");
        Ok((
            bill_repository::entity_to_domain(row)?,
            reading_repository::entity_to_domain(saved),
        ))
    }
}
