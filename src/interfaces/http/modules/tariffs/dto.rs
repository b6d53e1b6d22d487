//! Tariff DTOs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::billing::{ChargeBreakdown, ChargeSource, SlabCharge};
use crate::domain::{Department, TariffCategory, TariffSet, TariffSlab};

/// Tariff scope to look up
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ResolveTariffQuery {
    #[validate(length(min = 1))]
    pub region: String,
    #[validate(length(min = 1))]
    pub locality: String,
    /// `electricity`, `gas` or `water`
    #[param(value_type = String)]
    pub department: Department,
    /// `residential`, `commercial`, `industrial` or `agricultural`
    #[param(value_type = String)]
    pub category: TariffCategory,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TariffSlabDto {
    #[schema(value_type = String)]
    pub from_units: Decimal,
    /// `null` for an open-ended slab
    #[schema(value_type = Option<String>)]
    pub to_units: Option<Decimal>,
    #[schema(value_type = String)]
    pub rate_per_unit: Decimal,
}

impl From<TariffSlab> for TariffSlabDto {
    fn from(s: TariffSlab) -> Self {
        Self {
            from_units: s.from_units,
            to_units: s.to_units,
            rate_per_unit: s.rate_per_unit,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TariffSetResponse {
    pub id: i32,
    pub name: String,
    pub region: String,
    pub locality: String,
    pub department: String,
    pub category: String,
    #[schema(value_type = String)]
    pub fixed_charge: Decimal,
    #[schema(value_type = String)]
    pub tax_percentage: Decimal,
    /// Ascending by `from_units`
    pub slabs: Vec<TariffSlabDto>,
}

impl From<TariffSet> for TariffSetResponse {
    fn from(t: TariffSet) -> Self {
        Self {
            id: t.id,
            name: t.name,
            region: t.scope.jurisdiction.region,
            locality: t.scope.jurisdiction.locality,
            department: t.scope.department.to_string(),
            category: t.scope.category.to_string(),
            fixed_charge: t.fixed_charge,
            tax_percentage: t.tax_percentage,
            slabs: t.slabs.into_iter().map(Into::into).collect(),
        }
    }
}

/// Result of a tariff lookup. An unconfigured scope is billed at the
/// department's flat `fallback_rate`.
#[derive(Debug, Serialize, ToSchema)]
pub struct TariffResolutionResponse {
    pub configured: bool,
    pub tariff: Option<TariffSetResponse>,
    #[schema(value_type = String)]
    pub fallback_rate: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChargePreviewRequest {
    #[validate(range(min = 1, message = "account_id must be positive"))]
    pub account_id: i32,
    #[schema(value_type = String, example = "150")]
    pub consumption: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SlabChargeDto {
    #[schema(value_type = String)]
    pub from_units: Decimal,
    #[schema(value_type = Option<String>)]
    pub to_units: Option<Decimal>,
    #[schema(value_type = String)]
    pub units: Decimal,
    #[schema(value_type = String)]
    pub rate_per_unit: Decimal,
    #[schema(value_type = String)]
    pub amount: Decimal,
}

impl From<SlabCharge> for SlabChargeDto {
    fn from(s: SlabCharge) -> Self {
        Self {
            from_units: s.from_units,
            to_units: s.to_units,
            units: s.units,
            rate_per_unit: s.rate_per_unit,
            amount: s.amount,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChargeBreakdownResponse {
    #[schema(value_type = String)]
    pub consumption: Decimal,
    #[schema(value_type = String)]
    pub consumption_charge: Decimal,
    #[schema(value_type = String)]
    pub fixed_charge: Decimal,
    #[schema(value_type = String)]
    pub tax_amount: Decimal,
    #[schema(value_type = String)]
    pub total_amount: Decimal,
    pub used_fallback: bool,
    pub tariff_set_id: Option<i32>,
    /// `not_configured` or `lookup_failed` when the flat rate was used
    pub fallback_reason: Option<String>,
    pub slab_charges: Vec<SlabChargeDto>,
}

impl From<ChargeBreakdown> for ChargeBreakdownResponse {
    fn from(b: ChargeBreakdown) -> Self {
        let used_fallback = b.used_fallback();
        let (tariff_set_id, fallback_reason) = match &b.source {
            ChargeSource::Tariff { tariff_set_id } => (Some(*tariff_set_id), None),
            ChargeSource::Fallback { reason, .. } => (None, Some(reason.as_str().to_string())),
        };
        Self {
            consumption: b.consumption,
            consumption_charge: b.consumption_charge,
            fixed_charge: b.fixed_charge,
            tax_amount: b.tax_amount,
            total_amount: b.total_amount,
            used_fallback,
            tariff_set_id,
            fallback_reason,
            slab_charges: b.slab_charges.into_iter().map(Into::into).collect(),
        }
    }
}
