//! Tariff repository interface

use async_trait::async_trait;

use super::model::{TariffScope, TariffSet};
use crate::domain::DomainResult;

/// Read-only access to the externally managed tariff table.
///
/// Implementations may return slabs in any order.
#[async_trait]
pub trait TariffRepository: Send + Sync {
    async fn find_by_scope(&self, scope: &TariffScope) -> DomainResult<Option<TariffSet>>;
}
