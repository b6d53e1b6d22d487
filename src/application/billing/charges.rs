//! Charge computation for an account: resolve the tariff, then run the
//! slab calculator, degrading to the department's flat rate when the tariff
//! is missing or cannot be read.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::warn;

use super::calculator::{self, ChargeBreakdown, FallbackReason};
use super::resolver::{TariffResolution, TariffResolver};
use crate::config::FallbackRates;
use crate::domain::{Account, Department, DomainResult, RepositoryProvider};

pub struct ChargeCalculator {
    resolver: TariffResolver,
    fallback_rates: FallbackRates,
}

impl ChargeCalculator {
    pub fn new(repos: Arc<dyn RepositoryProvider>, fallback_rates: FallbackRates) -> Self {
        Self {
            resolver: TariffResolver::new(repos),
            fallback_rates,
        }
    }

    pub fn resolver(&self) -> &TariffResolver {
        &self.resolver
    }

    pub fn fallback_rate(&self, department: Department) -> Decimal {
        self.fallback_rates.rate_for(department)
    }

    /// A tariff lookup failure is reported through the breakdown's
    /// [`calculator::ChargeSource`]; only charges too large to represent
    /// fail.
    pub async fn charge(
        &self,
        account: &Account,
        consumption: Decimal,
    ) -> DomainResult<ChargeBreakdown> {
        let scope = account.tariff_scope();
        let fallback_rate = self.fallback_rates.rate_for(account.department);

        let breakdown = match self.resolver.resolve(&scope).await {
            Ok(TariffResolution::Configured(set)) => calculator::compute_tiered(consumption, &set),
            Ok(TariffResolution::NotConfigured) => calculator::compute_flat(
                consumption,
                fallback_rate,
                FallbackReason::NotConfigured,
            ),
            Err(e) => {
                warn!(
                    account_id = account.id,
                    error = %e,
                    "Tariff lookup failed"
                );
                calculator::compute_flat(
                    consumption,
                    fallback_rate,
                    FallbackReason::LookupFailed(e.to_string()),
                )
            }
        }?;

        if let calculator::ChargeSource::Fallback { rate, reason } = &breakdown.source {
            warn!(
                account_id = account.id,
                department = %account.department,
                jurisdiction = %scope.jurisdiction,
                category = %scope.category,
                rate = %rate,
                reason = reason.as_str(),
                "Using flat fallback rate"
            );
            metrics::counter!(
                "billing_tariff_fallback_total",
                "department" => account.department.as_str(),
                "reason" => reason.as_str()
            )
            .increment(1);
        }

        Ok(breakdown)
    }
}
