//! In-memory repositories for development and testing

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::domain::{
    Account, AccountRepository, Bill, BillDraft, BillRepository, BillStatus, BillingPeriod,
    DomainError, DomainResult, MeterReading, NewReading, ReadingRepository, RepositoryProvider,
    TariffRepository, TariffScope, TariffSet,
};

/// Bills are keyed the same way the database's unique index is.
type PeriodKey = (i32, i32, u32);

#[derive(Default)]
pub struct MemoryAccounts {
    accounts: DashMap<i32, Account>,
}

#[async_trait]
impl AccountRepository for MemoryAccounts {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Account>> {
        Ok(self.accounts.get(&id).map(|a| a.clone()))
    }
}

pub struct MemoryTariffs {
    sets: DashMap<TariffScope, TariffSet>,
    counter: AtomicI32,
}

impl Default for MemoryTariffs {
    fn default() -> Self {
        Self {
            sets: DashMap::new(),
            counter: AtomicI32::new(1),
        }
    }
}

#[async_trait]
impl TariffRepository for MemoryTariffs {
    async fn find_by_scope(&self, scope: &TariffScope) -> DomainResult<Option<TariffSet>> {
        Ok(self.sets.get(scope).map(|s| s.clone()))
    }
}

pub struct MemoryReadings {
    readings: DashMap<i32, MeterReading>,
    counter: AtomicI32,
}

impl Default for MemoryReadings {
    fn default() -> Self {
        Self {
            readings: DashMap::new(),
            counter: AtomicI32::new(1),
        }
    }
}

#[async_trait]
impl ReadingRepository for MemoryReadings {
    async fn record(&self, reading: NewReading) -> DomainResult<MeterReading> {
        let id = self.counter.fetch_add(1, Ordering::SeqCst);
        let stored = MeterReading {
            id,
            account_id: reading.account_id,
            meter_id: reading.meter_id,
            reading_date: reading.reading_date,
            previous_value: reading.previous_value,
            current_value: reading.current_value,
            channel: reading.channel,
            submitted_by: reading.submitted_by,
            bill_id: reading.bill_id,
            recorded_at: Utc::now(),
        };
        self.readings.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_by_account(&self, account_id: i32) -> DomainResult<Vec<MeterReading>> {
        let mut readings: Vec<MeterReading> = self
            .readings
            .iter()
            .filter(|r| r.account_id == account_id)
            .map(|r| r.value().clone())
            .collect();
        readings.sort_by(|a, b| (b.reading_date, b.id).cmp(&(a.reading_date, a.id)));
        Ok(readings)
    }
}

pub struct MemoryBills {
    bills: DashMap<PeriodKey, Bill>,
    counter: AtomicI32,
}

impl Default for MemoryBills {
    fn default() -> Self {
        Self {
            bills: DashMap::new(),
            counter: AtomicI32::new(1),
        }
    }
}

impl MemoryBills {
    fn key_of(&self, id: i32) -> Option<PeriodKey> {
        self.bills
            .iter()
            .find(|b| b.id == id)
            .map(|b| *b.key())
    }
}

#[async_trait]
impl BillRepository for MemoryBills {
    async fn upsert(&self, draft: BillDraft) -> DomainResult<Bill> {
        let key = (draft.account_id, draft.period.year, draft.period.month);
        let now = Utc::now();

        // The entry guard holds the shard lock across check and write.
        let bill = match self.bills.entry(key) {
            Entry::Occupied(mut entry) => {
                let bill = entry.get_mut();
                bill.bill_number = draft.bill_number;
                bill.meter_id = draft.meter_id;
                bill.consumption = draft.consumption;
                bill.consumption_charge = draft.consumption_charge;
                bill.fixed_charge = draft.fixed_charge;
                bill.tax_amount = draft.tax_amount;
                bill.total_amount = draft.total_amount;
                bill.period_start = draft.period_start;
                bill.period_end = draft.period_end;
                bill.issued_at = draft.issued_at;
                bill.due_date = draft.due_date;
                bill.used_fallback = draft.used_fallback;
                bill.status = BillStatus::Issued;
                bill.updated_at = now;
                bill.clone()
            }
            Entry::Vacant(entry) => {
                let bill = Bill {
                    id: self.counter.fetch_add(1, Ordering::SeqCst),
                    bill_number: draft.bill_number,
                    account_id: draft.account_id,
                    meter_id: draft.meter_id,
                    period: draft.period,
                    consumption: draft.consumption,
                    consumption_charge: draft.consumption_charge,
                    fixed_charge: draft.fixed_charge,
                    tax_amount: draft.tax_amount,
                    total_amount: draft.total_amount,
                    period_start: draft.period_start,
                    period_end: draft.period_end,
                    issued_at: draft.issued_at,
                    due_date: draft.due_date,
                    status: BillStatus::Issued,
                    used_fallback: draft.used_fallback,
                    created_at: now,
                    updated_at: now,
                };
                entry.insert(bill.clone());
                bill
            }
        };
        Ok(bill)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Bill>> {
        Ok(self
            .bills
            .iter()
            .find(|b| b.id == id)
            .map(|b| b.value().clone()))
    }

    async fn find_by_period(
        &self,
        account_id: i32,
        period: BillingPeriod,
    ) -> DomainResult<Option<Bill>> {
        Ok(self
            .bills
            .get(&(account_id, period.year, period.month))
            .map(|b| b.clone()))
    }

    async fn find_by_account(&self, account_id: i32) -> DomainResult<Vec<Bill>> {
        let mut bills: Vec<Bill> = self
            .bills
            .iter()
            .filter(|b| b.account_id == account_id)
            .map(|b| b.value().clone())
            .collect();
        bills.sort_by(|a, b| b.period.cmp(&a.period));
        Ok(bills)
    }

    async fn update_status(&self, id: i32, status: BillStatus) -> DomainResult<Bill> {
        let not_found = || DomainError::NotFound {
            entity: "Bill",
            field: "id",
            value: id.to_string(),
        };
        let key = self.key_of(id).ok_or_else(not_found)?;
        let mut bill = self.bills.get_mut(&key).ok_or_else(not_found)?;
        bill.status = status;
        bill.updated_at = Utc::now();
        Ok(bill.clone())
    }
}

/// DashMap-backed [`RepositoryProvider`].
///
/// Individual repositories can be swapped out, which is how tests inject
/// failing stores.
pub struct InMemoryRepositoryProvider {
    accounts: MemoryAccounts,
    tariff_store: Arc<MemoryTariffs>,
    tariffs: Arc<dyn TariffRepository>,
    readings: MemoryReadings,
    bills: Arc<dyn BillRepository>,
    unavailable: AtomicBool,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        let tariff_store = Arc::new(MemoryTariffs::default());
        Self {
            accounts: MemoryAccounts::default(),
            tariffs: tariff_store.clone(),
            tariff_store,
            readings: MemoryReadings::default(),
            bills: Arc::new(MemoryBills::default()),
            unavailable: AtomicBool::new(false),
        }
    }

    pub fn with_tariff_repository(mut self, repo: impl TariffRepository + 'static) -> Self {
        self.tariffs = Arc::new(repo);
        self
    }

    pub fn with_bill_repository(mut self, repo: impl BillRepository + 'static) -> Self {
        self.bills = Arc::new(repo);
        self
    }

    pub fn insert_account(&self, account: Account) {
        self.accounts.accounts.insert(account.id, account);
    }

    /// Stores `set` under its scope, replacing any previous set, and
    /// returns the assigned id.
    pub fn insert_tariff(&self, mut set: TariffSet) -> i32 {
        set.id = self.tariff_store.counter.fetch_add(1, Ordering::SeqCst);
        let id = set.id;
        self.tariff_store.sets.insert(set.scope.clone(), set);
        id
    }

    /// Makes [`RepositoryProvider::ping`] fail.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

impl Default for InMemoryRepositoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RepositoryProvider for InMemoryRepositoryProvider {
    fn accounts(&self) -> &dyn AccountRepository {
        &self.accounts
    }

    fn tariffs(&self) -> &dyn TariffRepository {
        self.tariffs.as_ref()
    }

    fn readings(&self) -> &dyn ReadingRepository {
        &self.readings
    }

    fn bills(&self) -> &dyn BillRepository {
        self.bills.as_ref()
    }

    /// Recording a reading in memory cannot fail, so the bill upsert is the
    /// only step that can abort the submission.
    async fn record_submission(
        &self,
        bill: BillDraft,
        reading: NewReading,
    ) -> DomainResult<(Bill, MeterReading)> {
        let bill = self.bills.upsert(bill).await?;
        let reading = self
            .readings
            .record(NewReading {
                bill_id: Some(bill.id),
                ..reading
            })
            .await?;
        Ok((bill, reading))
    }

    async fn ping(&self) -> DomainResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::StoreUnavailable(
                "in-memory store marked unavailable".into(),
            ));
        }
        Ok(())
    }
}
