//! SeaORM implementation of BillRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::OnConflict, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::debug;

use super::to_column;
use crate::domain::{
    Bill, BillDraft, BillRepository, BillStatus, BillingPeriod, DomainError, DomainResult,
};
use crate::infrastructure::database::entities::bill;
use crate::support::money::{from_scaled, MONEY_SCALE, QUANTITY_SCALE};

pub(super) fn entity_to_domain(m: bill::Model) -> DomainResult<Bill> {
    let period = u32::try_from(m.billing_month)
        .ok()
        .and_then(|month| BillingPeriod::new(m.billing_year, month))
        .ok_or_else(|| {
            DomainError::Persistence(format!(
                "bill {} has invalid billing period {}-{}",
                m.id, m.billing_year, m.billing_month
            ))
        })?;

    Ok(Bill {
        id: m.id,
        bill_number: m.bill_number,
        account_id: m.account_id,
        meter_id: m.meter_id,
        period,
        consumption: from_scaled(m.consumption, QUANTITY_SCALE),
        consumption_charge: from_scaled(m.consumption_charge, MONEY_SCALE),
        fixed_charge: from_scaled(m.fixed_charge, MONEY_SCALE),
        tax_amount: from_scaled(m.tax_amount, MONEY_SCALE),
        total_amount: from_scaled(m.total_amount, MONEY_SCALE),
        period_start: m.period_start,
        period_end: m.period_end,
        issued_at: m.issued_at,
        due_date: m.due_date,
        status: m.status.into(),
        used_fallback: m.used_fallback,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

fn not_found(id: i32) -> DomainError {
    DomainError::NotFound {
        entity: "Bill",
        field: "id",
        value: id.to_string(),
    }
}

pub struct SeaOrmBillRepository {
    db: DatabaseConnection,
}

impl SeaOrmBillRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Column values for a draft. Fails before anything is written when a
/// figure does not fit its column.
pub(super) fn active_model(d: BillDraft) -> DomainResult<bill::ActiveModel> {
    let now = Utc::now();
    Ok(bill::ActiveModel {
        bill_number: Set(d.bill_number),
        account_id: Set(d.account_id),
        meter_id: Set(d.meter_id),
        billing_year: Set(d.period.year),
        billing_month: Set(d.period.month as i32),
        consumption: Set(to_column(d.consumption, QUANTITY_SCALE, "consumption")?),
        consumption_charge: Set(to_column(d.consumption_charge, MONEY_SCALE, "consumption_charge")?),
        fixed_charge: Set(to_column(d.fixed_charge, MONEY_SCALE, "fixed_charge")?),
        tax_amount: Set(to_column(d.tax_amount, MONEY_SCALE, "tax_amount")?),
        total_amount: Set(to_column(d.total_amount, MONEY_SCALE, "total_amount")?),
        period_start: Set(d.period_start),
        period_end: Set(d.period_end),
        issued_at: Set(d.issued_at),
        due_date: Set(d.due_date),
        status: Set(BillStatus::Issued.into()),
        used_fallback: Set(d.used_fallback),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    })
}

/// `INSERT .. ON CONFLICT (account_id, billing_year, billing_month) DO UPDATE`
/// followed by a read of the row. Callers run it inside a transaction.
pub(super) async fn upsert_row<C: ConnectionTrait>(
    conn: &C,
    model: bill::ActiveModel,
    account_id: i32,
    period: BillingPeriod,
) -> DomainResult<bill::Model> {
    bill::Entity::insert(model)
        .on_conflict(
            OnConflict::columns([
                bill::Column::AccountId,
                bill::Column::BillingYear,
                bill::Column::BillingMonth,
            ])
            .update_columns([
                bill::Column::BillNumber,
                bill::Column::MeterId,
                bill::Column::Consumption,
                bill::Column::ConsumptionCharge,
                bill::Column::FixedCharge,
                bill::Column::TaxAmount,
                bill::Column::TotalAmount,
                bill::Column::PeriodStart,
                bill::Column::PeriodEnd,
                bill::Column::IssuedAt,
                bill::Column::DueDate,
                bill::Column::Status,
                bill::Column::UsedFallback,
                bill::Column::UpdatedAt,
            ])
            .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

    let row = bill::Entity::find()
        .filter(bill::Column::AccountId.eq(account_id))
        .filter(bill::Column::BillingYear.eq(period.year))
        .filter(bill::Column::BillingMonth.eq(period.month as i32))
        .one(conn)
        .await?
        .ok_or_else(|| {
            DomainError::Persistence(format!(
                "bill for account {} period {} missing after upsert",
                account_id, period
            ))
        })?;
    debug!(bill_id = row.id, account_id = row.account_id, "Bill row upserted");
    Ok(row)
}

#[async_trait]
impl BillRepository for SeaOrmBillRepository {
    async fn upsert(&self, d: BillDraft) -> DomainResult<Bill> {
        let (account_id, period) = (d.account_id, d.period);
        let model = active_model(d)?;
        let txn = self.db.begin().await?;
        let row = upsert_row(&txn, model, account_id, period).await?;
        txn.commit().await?;
        entity_to_domain(row)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Bill>> {
        bill::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(entity_to_domain)
            .transpose()
    }

    async fn find_by_period(
        &self,
        account_id: i32,
        period: BillingPeriod,
    ) -> DomainResult<Option<Bill>> {
        bill::Entity::find()
            .filter(bill::Column::AccountId.eq(account_id))
            .filter(bill::Column::BillingYear.eq(period.year))
            .filter(bill::Column::BillingMonth.eq(period.month as i32))
            .one(&self.db)
            .await?
            .map(entity_to_domain)
            .transpose()
    }

    async fn find_by_account(&self, account_id: i32) -> DomainResult<Vec<Bill>> {
        bill::Entity::find()
            .filter(bill::Column::AccountId.eq(account_id))
            .order_by_desc(bill::Column::BillingYear)
            .order_by_desc(bill::Column::BillingMonth)
            .all(&self.db)
            .await?
            .into_iter()
            .map(entity_to_domain)
            .collect()
    }

    async fn update_status(&self, id: i32, status: BillStatus) -> DomainResult<Bill> {
        let existing = bill::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| not_found(id))?;

        let mut model: bill::ActiveModel = existing.into();
        model.status = Set(status.into());
        model.updated_at = Set(Utc::now());
        let updated = model.update(&self.db).await?;
        entity_to_domain(updated)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::{Account, ConnectionStatus, Department, Jurisdiction, TariffCategory};
    use crate::infrastructure::database::repositories::testing::{file_db, test_db};
    use crate::infrastructure::database::repositories::SeaOrmAccountRepository;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    async fn repo_with_account(account_id: i32) -> SeaOrmBillRepository {
        seed_account(test_db().await, account_id).await
    }

    async fn seed_account(db: DatabaseConnection, account_id: i32) -> SeaOrmBillRepository {
        SeaOrmAccountRepository::new(db.clone())
            .save(&Account {
                id: account_id,
                jurisdiction: Jurisdiction::new("North", "Springfield"),
                department: Department::Electricity,
                category: TariffCategory::Residential,
                meter_id: format!("MTR-{}", account_id),
                connection_status: ConnectionStatus::Active,
            })
            .await
            .unwrap();
        SeaOrmBillRepository::new(db)
    }

    fn draft(account_id: i32, day: u32, total: Decimal) -> BillDraft {
        let reading_date = NaiveDate::from_ymd_opt(2026, 3, day).unwrap();
        let period = BillingPeriod::containing(reading_date);
        BillDraft {
            bill_number: period.bill_number(account_id),
            account_id,
            meter_id: format!("MTR-{}", account_id),
            period,
            consumption: dec!(150.5),
            consumption_charge: total,
            fixed_charge: dec!(0),
            tax_amount: dec!(0),
            total_amount: total,
            period_start: period.first_day(),
            period_end: reading_date,
            issued_at: Utc::now(),
            due_date: reading_date + chrono::Days::new(15),
            used_fallback: false,
        }
    }

    #[tokio::test]
    async fn upsert_overwrites_same_period() {
        let repo = repo_with_account(7).await;

        let first = repo.upsert(draft(7, 5, dec!(100.10))).await.unwrap();
        repo.update_status(first.id, BillStatus::Partial).await.unwrap();
        let second = repo.upsert(draft(7, 25, dec!(1042.00))).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.bill_number, "BILL-000007-202603");
        assert_eq!(second.total_amount, dec!(1042.00));
        assert_eq!(second.consumption, dec!(150.5));
        assert_eq!(second.status, BillStatus::Issued);
        assert_eq!(second.period_end, NaiveDate::from_ymd_opt(2026, 3, 25).unwrap());

        let all = repo.find_by_account(7).await.unwrap();
        assert_eq!(all.len(), 1);
        let by_period = repo
            .find_by_period(7, BillingPeriod::new(2026, 3).unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_period.id, first.id);
    }

    #[tokio::test]
    async fn status_update_and_missing_bill() {
        let repo = repo_with_account(8).await;
        let bill = repo.upsert(draft(8, 10, dec!(12.35))).await.unwrap();

        let paid = repo.update_status(bill.id, BillStatus::Paid).await.unwrap();
        assert_eq!(paid.status, BillStatus::Paid);
        assert_eq!(
            repo.find_by_id(bill.id).await.unwrap().unwrap().status,
            BillStatus::Paid
        );

        let err = repo.update_status(999, BillStatus::Paid).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
        assert!(repo.find_by_id(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn missing_account_is_persistence_failure() {
        let repo = repo_with_account(1).await;
        let err = repo.upsert(draft(2, 10, dec!(1))).await.unwrap_err();
        assert!(matches!(err, DomainError::Persistence(_)));
    }

    #[tokio::test]
    async fn concurrent_upserts_yield_one_row() {
        let dir = tempfile::tempdir().unwrap();
        let db = file_db(dir.path(), 4).await;
        let repo = Arc::new(seed_account(db, 9).await);
        let mut handles = Vec::new();
        for day in 1..=12u32 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                repo.upsert(draft(9, day, Decimal::from(day))).await
            }));
        }
        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap().id);
        }
        ids.dedup();
        assert_eq!(ids.len(), 1);
        assert_eq!(repo.find_by_account(9).await.unwrap().len(), 1);
    }
}
