//! Meter reading repository interface

use async_trait::async_trait;

use super::model::{MeterReading, NewReading};
use crate::domain::DomainResult;

#[async_trait]
pub trait ReadingRepository: Send + Sync {
    async fn record(&self, reading: NewReading) -> DomainResult<MeterReading>;
    /// Newest first
    async fn find_by_account(&self, account_id: i32) -> DomainResult<Vec<MeterReading>>;
}
