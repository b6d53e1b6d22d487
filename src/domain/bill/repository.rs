//! Bill repository interface

use async_trait::async_trait;

use super::model::{Bill, BillDraft, BillStatus, BillingPeriod};
use crate::domain::DomainResult;

#[async_trait]
pub trait BillRepository: Send + Sync {
    /// Insert or overwrite the bill for `(draft.account_id, draft.period)`.
    ///
    /// Must be a single atomic check-then-write: concurrent calls for the
    /// same key leave exactly one row holding one of the written drafts.
    async fn upsert(&self, draft: BillDraft) -> DomainResult<Bill>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Bill>>;
    async fn find_by_period(
        &self,
        account_id: i32,
        period: BillingPeriod,
    ) -> DomainResult<Option<Bill>>;
    /// Newest period first
    async fn find_by_account(&self, account_id: i32) -> DomainResult<Vec<Bill>>;
    async fn update_status(&self, id: i32, status: BillStatus) -> DomainResult<Bill>;
}
