//! Bill lifecycle: turn a charge breakdown into the single bill of an
//! account's billing period.

use std::sync::Arc;

use chrono::{Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::info;

use super::calculator::ChargeBreakdown;
use crate::domain::{
    Bill, BillDraft, BillStatus, BillingPeriod, DomainError, DomainResult, MeterReading,
    NewReading, RepositoryProvider,
};

pub struct BillLifecycleManager {
    repos: Arc<dyn RepositoryProvider>,
    due_days: u32,
}

impl BillLifecycleManager {
    pub fn new(repos: Arc<dyn RepositoryProvider>, due_days: u32) -> Self {
        Self { repos, due_days }
    }

    /// Build the upsert payload for a reading taken on `reading_date`.
    ///
    /// The period runs from the first of the month up to the reading date;
    /// the due date is `due_days` after the reading.
    pub fn draft(
        &self,
        account_id: i32,
        meter_id: &str,
        consumption: Decimal,
        breakdown: &ChargeBreakdown,
        reading_date: NaiveDate,
    ) -> DomainResult<BillDraft> {
        let period = BillingPeriod::containing(reading_date);
        let due_date = reading_date
            .checked_add_days(Days::new(u64::from(self.due_days)))
            .ok_or_else(|| {
                DomainError::Validation(format!("reading date {} is out of range", reading_date))
            })?;

        Ok(BillDraft {
            bill_number: period.bill_number(account_id),
            account_id,
            meter_id: meter_id.to_string(),
            period,
            consumption,
            consumption_charge: breakdown.consumption_charge,
            fixed_charge: breakdown.fixed_charge,
            tax_amount: breakdown.tax_amount,
            total_amount: breakdown.total_amount,
            period_start: period.first_day(),
            period_end: reading_date,
            issued_at: Utc::now(),
            due_date,
            used_fallback: breakdown.used_fallback(),
        })
    }

    /// Insert the period's bill, or overwrite it when one already exists,
    /// and record `reading` against it in the same unit of work.
    /// Last write wins; the status goes back to `issued`.
    pub async fn upsert_bill(
        &self,
        consumption: Decimal,
        breakdown: &ChargeBreakdown,
        reading: NewReading,
    ) -> DomainResult<(Bill, MeterReading)> {
        let draft = self.draft(
            reading.account_id,
            &reading.meter_id,
            consumption,
            breakdown,
            reading.reading_date,
        )?;
        let (bill, reading) = self.repos.record_submission(draft, reading).await?;

        info!(
            bill_id = bill.id,
            bill_number = %bill.bill_number,
            account_id = bill.account_id,
            period = %bill.period,
            total = %bill.total_amount,
            used_fallback = bill.used_fallback,
            "Bill issued"
        );
        Ok((bill, reading))
    }

    /// Status hook for the payment collaborator. A bill only returns to
    /// `issued` through a new reading for its period.
    pub async fn update_status(&self, bill_id: i32, status: BillStatus) -> DomainResult<Bill> {
        if status == BillStatus::Issued {
            return Err(DomainError::Validation(
                "status can only be set to paid, overdue or partial".into(),
            ));
        }
        let bill = self.repos.bills().update_status(bill_id, status).await?;
        info!(bill_id, status = %status, "Bill status updated");
        Ok(bill)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::billing::calculator::compute;
    use crate::domain::SubmissionChannel;
    use crate::infrastructure::storage::InMemoryRepositoryProvider;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn reading_on(day: NaiveDate, previous: Decimal, current: Decimal) -> NewReading {
        NewReading {
            account_id: 7,
            meter_id: "MTR-7".into(),
            reading_date: day,
            previous_value: previous,
            current_value: current,
            channel: SubmissionChannel::Api,
            submitted_by: None,
            bill_id: None,
        }
    }

    async fn issue(
        manager: &BillLifecycleManager,
        consumption: Decimal,
        day: NaiveDate,
    ) -> Bill {
        let bd = compute(consumption, None, dec!(5)).unwrap();
        let (bill, reading) = manager
            .upsert_bill(consumption, &bd, reading_on(day, dec!(0), consumption))
            .await
            .unwrap();
        assert_eq!(reading.bill_id, Some(bill.id));
        bill
    }

    #[test]
    fn draft_period_and_due_date() {
        let manager = BillLifecycleManager::new(Arc::new(InMemoryRepositoryProvider::new()), 15);
        let bd = compute(dec!(100), None, dec!(5)).unwrap();
        let draft = manager
            .draft(7, "MTR-7", dec!(100), &bd, date(2026, 3, 20))
            .unwrap();

        assert_eq!(draft.period, BillingPeriod::new(2026, 3).unwrap());
        assert_eq!(draft.period_start, date(2026, 3, 1));
        assert_eq!(draft.period_end, date(2026, 3, 20));
        assert_eq!(draft.due_date, date(2026, 4, 4));
        assert_eq!(draft.bill_number, "BILL-000007-202603");
        assert_eq!(draft.total_amount, dec!(500.00));
        assert!(draft.used_fallback);
    }

    #[tokio::test]
    async fn second_reading_in_period_overwrites() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let manager = BillLifecycleManager::new(repos.clone(), 15);

        let first = issue(&manager, dec!(100), date(2026, 3, 5)).await;
        manager.update_status(first.id, BillStatus::Partial).await.unwrap();

        let second = issue(&manager, dec!(140), date(2026, 3, 25)).await;

        assert_eq!(first.id, second.id);
        assert_eq!(first.bill_number, second.bill_number);
        assert_eq!(second.total_amount, dec!(700.00));
        assert_eq!(second.period_end, date(2026, 3, 25));
        assert_eq!(second.due_date, date(2026, 4, 9));
        assert_eq!(second.status, BillStatus::Issued);
        assert_eq!(repos.bills().find_by_account(7).await.unwrap().len(), 1);
        assert_eq!(repos.readings().find_by_account(7).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn status_hook_rejects_issued() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let manager = BillLifecycleManager::new(repos, 15);
        let bill = issue(&manager, dec!(1), date(2026, 3, 5)).await;

        let err = manager.update_status(bill.id, BillStatus::Issued).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        let overdue = manager.update_status(bill.id, BillStatus::Overdue).await.unwrap();
        assert_eq!(overdue.status, BillStatus::Overdue);
    }

    #[tokio::test]
    async fn new_month_creates_new_bill() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let manager = BillLifecycleManager::new(repos.clone(), 15);

        let march = issue(&manager, dec!(10), date(2026, 3, 31)).await;
        let april = issue(&manager, dec!(10), date(2026, 4, 1)).await;

        assert_ne!(march.id, april.id);
        assert_eq!(april.bill_number, "BILL-000007-202604");
        assert_eq!(repos.bills().find_by_account(7).await.unwrap().len(), 2);
    }
}
