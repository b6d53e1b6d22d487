//! Tariff resolver
//!
//! Looks up the tariff set for a scope and hands it back with slabs in
//! ascending order. "Nothing configured" is a normal outcome, not an error.

use std::sync::Arc;

use tracing::debug;

use crate::domain::{DomainResult, RepositoryProvider, TariffScope, TariffSet};

#[derive(Debug, Clone, PartialEq)]
pub enum TariffResolution {
    Configured(TariffSet),
    NotConfigured,
}

impl TariffResolution {
    pub fn into_tariff(self) -> Option<TariffSet> {
        match self {
            Self::Configured(set) => Some(set),
            Self::NotConfigured => None,
        }
    }
}

pub struct TariffResolver {
    repos: Arc<dyn RepositoryProvider>,
}

impl TariffResolver {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Store failures are returned as `Err`; the caller decides whether to
    /// fall back.
    pub async fn resolve(&self, scope: &TariffScope) -> DomainResult<TariffResolution> {
        let Some(mut set) = self.repos.tariffs().find_by_scope(scope).await? else {
            debug!(
                jurisdiction = %scope.jurisdiction,
                department = %scope.department,
                category = %scope.category,
                "No tariff set configured"
            );
            return Ok(TariffResolution::NotConfigured);
        };

        if set.slabs.is_empty() {
            debug!(tariff_set_id = set.id, "Tariff set has no slabs");
            return Ok(TariffResolution::NotConfigured);
        }

        set.sort_slabs();
        Ok(TariffResolution::Configured(set))
    }
}
