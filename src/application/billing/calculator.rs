//! Slab billing calculator
//!
//! Pure functions from `(consumption, tariff)` to a [`ChargeBreakdown`].
//! No I/O happens here; tariff lookup lives in [`super::resolver`].
//!
//! Rounding is half away from zero to two places and is applied after every
//! aggregation step (each slab charge, the running consumption charge, the
//! tax and the total) so the figures match legacy billing output exactly.

use std::borrow::Cow;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::{DomainError, TariffSet};
use crate::support::money::round2;

/// A charge figure left the range `Decimal` can represent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("charges for {consumption} units exceed the representable amount")]
pub struct ChargeOverflow {
    pub consumption: Decimal,
}

impl From<ChargeOverflow> for DomainError {
    fn from(e: ChargeOverflow) -> Self {
        DomainError::Validation(e.to_string())
    }
}

/// Why the flat fallback rate was used instead of a tariff
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// No tariff set (or an empty one) matches the account's scope
    NotConfigured,
    /// The tariff lookup itself failed
    LookupFailed(String),
}

impl FallbackReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotConfigured => "not_configured",
            Self::LookupFailed(_) => "lookup_failed",
        }
    }
}

/// Where the charges in a breakdown came from
#[derive(Debug, Clone, PartialEq)]
pub enum ChargeSource {
    Tariff { tariff_set_id: i32 },
    Fallback { rate: Decimal, reason: FallbackReason },
}

/// Charge for the part of the consumption that fell into one slab
#[derive(Debug, Clone, PartialEq)]
pub struct SlabCharge {
    pub from_units: Decimal,
    pub to_units: Option<Decimal>,
    pub units: Decimal,
    pub rate_per_unit: Decimal,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChargeBreakdown {
    pub consumption: Decimal,
    pub consumption_charge: Decimal,
    pub fixed_charge: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
    pub slab_charges: Vec<SlabCharge>,
    pub source: ChargeSource,
}

impl ChargeBreakdown {
    pub fn used_fallback(&self) -> bool {
        matches!(self.source, ChargeSource::Fallback { .. })
    }

    fn zero(consumption: Decimal, source: ChargeSource) -> Self {
        Self {
            consumption,
            consumption_charge: Decimal::ZERO,
            fixed_charge: Decimal::ZERO,
            tax_amount: Decimal::ZERO,
            total_amount: Decimal::ZERO,
            slab_charges: Vec::new(),
            source,
        }
    }
}

/// Compute charges against `tariff`, or against the flat `fallback_rate`
/// when no tariff is available.
pub fn compute(
    consumption: Decimal,
    tariff: Option<&TariffSet>,
    fallback_rate: Decimal,
) -> Result<ChargeBreakdown, ChargeOverflow> {
    match tariff {
        Some(set) if !set.slabs.is_empty() => compute_tiered(consumption, set),
        _ => compute_flat(consumption, fallback_rate, FallbackReason::NotConfigured),
    }
}

/// Progressive tiering over the tariff's slabs.
///
/// The last slab absorbs whatever consumption remains, bounded or not.
pub fn compute_tiered(
    consumption: Decimal,
    tariff: &TariffSet,
) -> Result<ChargeBreakdown, ChargeOverflow> {
    let source = ChargeSource::Tariff {
        tariff_set_id: tariff.id,
    };
    if consumption <= Decimal::ZERO {
        return Ok(ChargeBreakdown::zero(consumption.max(Decimal::ZERO), source));
    }
    let overflow = || ChargeOverflow { consumption };

    let slabs: Cow<'_, TariffSet> = if tariff.is_sorted() {
        Cow::Borrowed(tariff)
    } else {
        let mut sorted = tariff.clone();
        sorted.sort_slabs();
        Cow::Owned(sorted)
    };

    let mut remaining = consumption;
    let mut consumption_charge = Decimal::ZERO;
    let mut slab_charges = Vec::new();
    let last = slabs.slabs.len().saturating_sub(1);

    for (idx, slab) in slabs.slabs.iter().enumerate() {
        if remaining <= Decimal::ZERO {
            break;
        }
        let units = match slab.width() {
            Some(width) if idx < last => remaining.min(width),
            _ => remaining,
        };
        if units <= Decimal::ZERO {
            continue;
        }
        let amount = round2(units.checked_mul(slab.rate_per_unit).ok_or_else(overflow)?);
        consumption_charge = round2(consumption_charge.checked_add(amount).ok_or_else(overflow)?);
        remaining -= units;
        slab_charges.push(SlabCharge {
            from_units: slab.from_units,
            to_units: slab.to_units,
            units,
            rate_per_unit: slab.rate_per_unit,
            amount,
        });
    }

    let fixed_charge = round2(tariff.fixed_charge);
    let taxable = consumption_charge
        .checked_add(fixed_charge)
        .ok_or_else(overflow)?;
    let tax_amount = round2(
        taxable
            .checked_mul(tariff.tax_percentage)
            .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
            .ok_or_else(overflow)?,
    );
    let total_amount = round2(taxable.checked_add(tax_amount).ok_or_else(overflow)?);

    Ok(ChargeBreakdown {
        consumption,
        consumption_charge,
        fixed_charge,
        tax_amount,
        total_amount,
        slab_charges,
        source,
    })
}

/// Flat per-unit pricing with no fixed charge and no tax.
pub fn compute_flat(
    consumption: Decimal,
    rate: Decimal,
    reason: FallbackReason,
) -> Result<ChargeBreakdown, ChargeOverflow> {
    let source = ChargeSource::Fallback { rate, reason };
    if consumption <= Decimal::ZERO {
        return Ok(ChargeBreakdown::zero(consumption.max(Decimal::ZERO), source));
    }
    let consumption_charge = round2(
        consumption
            .checked_mul(rate)
            .ok_or(ChargeOverflow { consumption })?,
    );
    Ok(ChargeBreakdown {
        consumption,
        consumption_charge,
        fixed_charge: Decimal::ZERO,
        tax_amount: Decimal::ZERO,
        total_amount: consumption_charge,
        slab_charges: vec![SlabCharge {
            from_units: Decimal::ZERO,
            to_units: None,
            units: consumption,
            rate_per_unit: rate,
            amount: consumption_charge,
        }],
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Department, Jurisdiction, TariffCategory, TariffScope, TariffSlab};
    use rust_decimal_macros::dec;

    fn tariff(slabs: Vec<TariffSlab>, fixed: Decimal, tax: Decimal) -> TariffSet {
        TariffSet {
            id: 11,
            name: "Residential LT".into(),
            scope: TariffScope {
                jurisdiction: Jurisdiction::new("North", "Springfield"),
                department: Department::Electricity,
                category: TariffCategory::Residential,
            },
            fixed_charge: fixed,
            tax_percentage: tax,
            slabs,
        }
    }

    fn two_slabs() -> Vec<TariffSlab> {
        vec![
            TariffSlab::new(dec!(0), Some(dec!(100)), dec!(6.42)),
            TariffSlab::new(dec!(101), Some(dec!(300)), dec!(8.00)),
        ]
    }

    #[test]
    fn consumption_150_spans_two_slabs() {
        let bd = compute_tiered(dec!(150), &tariff(two_slabs(), dec!(0), dec!(0))).unwrap();
        assert_eq!(bd.consumption_charge, dec!(1042.00));
        assert_eq!(bd.slab_charges.len(), 2);
        assert_eq!(bd.slab_charges[0].amount, dec!(642.00));
        assert_eq!(bd.slab_charges[1].units, dec!(50));
        assert_eq!(bd.slab_charges[1].amount, dec!(400.00));
        assert_eq!(bd.total_amount, dec!(1042.00));
        assert!(!bd.used_fallback());
    }

    #[test]
    fn consumption_within_first_slab() {
        let bd = compute_tiered(dec!(40), &tariff(two_slabs(), dec!(0), dec!(0))).unwrap();
        assert_eq!(bd.consumption_charge, dec!(256.80));
        assert_eq!(bd.slab_charges.len(), 1);
    }

    #[test]
    fn unbounded_last_slab_absorbs_remainder() {
        let mut slabs = two_slabs();
        slabs.push(TariffSlab::new(dec!(300), None, dec!(9.50)));
        let bd = compute_tiered(dec!(1000), &tariff(slabs, dec!(0), dec!(0))).unwrap();
        // 100 × 6.42 + 199 × 8.00 + 701 × 9.50
        assert_eq!(bd.consumption_charge, dec!(642.00) + dec!(1592.00) + dec!(6659.50));
        assert_eq!(bd.slab_charges[2].units, dec!(701));
    }

    #[test]
    fn bounded_last_slab_still_absorbs_remainder() {
        let bd = compute_tiered(dec!(500), &tariff(two_slabs(), dec!(0), dec!(0))).unwrap();
        // 100 × 6.42 + 400 × 8.00
        assert_eq!(bd.consumption_charge, dec!(3842.00));
        assert_eq!(bd.slab_charges[1].units, dec!(400));
    }

    #[test]
    fn zero_consumption_is_all_zero() {
        let bd = compute_tiered(dec!(0), &tariff(two_slabs(), dec!(75), dec!(18))).unwrap();
        assert_eq!(bd.consumption_charge, dec!(0));
        assert_eq!(bd.fixed_charge, dec!(0));
        assert_eq!(bd.tax_amount, dec!(0));
        assert_eq!(bd.total_amount, dec!(0));

        let flat = compute(dec!(0), None, dec!(5)).unwrap();
        assert_eq!(flat.total_amount, dec!(0));
        assert!(flat.used_fallback());
    }

    #[test]
    fn fixed_charge_and_tax_come_from_the_set() {
        let set = tariff(two_slabs(), dec!(50), dec!(10));
        // Only the first tier is reached: set-level values still apply.
        let low = compute_tiered(dec!(10), &set).unwrap();
        assert_eq!(low.consumption_charge, dec!(64.20));
        assert_eq!(low.fixed_charge, dec!(50));
        assert_eq!(low.tax_amount, dec!(11.42));
        assert_eq!(low.total_amount, dec!(125.62));

        // Second tier reached: same fixed charge, same tax rate.
        let high = compute_tiered(dec!(150), &set).unwrap();
        assert_eq!(high.fixed_charge, dec!(50));
        assert_eq!(high.tax_amount, dec!(109.20));
        assert_eq!(high.total_amount, dec!(1201.20));
    }

    #[test]
    fn consumption_charge_rounds_before_tax() {
        // 10 × 12.3455 = 123.455 → 123.46
        let set = tariff(
            vec![TariffSlab::new(dec!(0), None, dec!(12.3455))],
            dec!(0),
            dec!(10),
        );
        let bd = compute_tiered(dec!(10), &set).unwrap();
        assert_eq!(bd.consumption_charge, dec!(123.46));
        // tax on the rounded charge: 12.346 → 12.35
        assert_eq!(bd.tax_amount, dec!(12.35));
        assert_eq!(bd.total_amount, dec!(135.81));
    }

    #[test]
    fn unordered_slabs_are_walked_ascending() {
        let mut slabs = two_slabs();
        slabs.reverse();
        let bd = compute_tiered(dec!(150), &tariff(slabs, dec!(0), dec!(0))).unwrap();
        assert_eq!(bd.consumption_charge, dec!(1042.00));
    }

    #[test]
    fn fallback_when_no_tariff() {
        let bd = compute(dec!(150), None, dec!(5.00)).unwrap();
        assert!(bd.used_fallback());
        assert_eq!(bd.consumption_charge, dec!(750.00));
        assert_eq!(bd.fixed_charge, dec!(0));
        assert_eq!(bd.tax_amount, dec!(0));
        assert_eq!(bd.total_amount, dec!(750.00));
        assert_eq!(
            bd.source,
            ChargeSource::Fallback {
                rate: dec!(5.00),
                reason: FallbackReason::NotConfigured
            }
        );
    }

    #[test]
    fn fallback_when_tariff_has_no_slabs() {
        let bd = compute(dec!(3), Some(&tariff(vec![], dec!(40), dec!(18))), dec!(2.5)).unwrap();
        assert!(bd.used_fallback());
        assert_eq!(bd.total_amount, dec!(7.50));
    }

    #[test]
    fn fractional_consumption() {
        let bd = compute_tiered(dec!(100.5), &tariff(two_slabs(), dec!(0), dec!(0))).unwrap();
        // 100 × 6.42 + 0.5 × 8.00
        assert_eq!(bd.consumption_charge, dec!(646.00));
    }

    #[test]
    fn overflowing_charges_are_reported() {
        let huge_rate = tariff(
            vec![TariffSlab::new(dec!(0), None, Decimal::MAX)],
            dec!(0),
            dec!(0),
        );
        let err = compute_tiered(dec!(1000), &huge_rate).unwrap_err();
        assert_eq!(err.consumption, dec!(1000));

        let err = compute(Decimal::MAX, None, dec!(5)).unwrap_err();
        assert_eq!(DomainError::from(err).kind(), crate::domain::ErrorKind::Validation);

        let taxed = tariff(
            vec![TariffSlab::new(dec!(0), None, Decimal::MAX / dec!(4))],
            Decimal::MAX / dec!(2),
            dec!(10),
        );
        assert!(compute_tiered(dec!(1), &taxed).is_err());
    }
}
