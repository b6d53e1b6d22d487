//! Monetary rounding and fixed-scale storage helpers
//!
//! Domain values are `Decimal`. The database keeps them as integers at a
//! fixed scale (the same way prices are stored in minor units), so that
//! SQLite never round-trips money through floating point.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Currency amounts: minor units (1/100).
pub const MONEY_SCALE: u32 = 2;
/// Per-unit rates: 1/10000 of the currency unit.
pub const RATE_SCALE: u32 = 4;
/// Meter readings and consumption: 1/1000 of a metered unit.
pub const QUANTITY_SCALE: u32 = 3;
/// Tax percentage: hundredths of a percent.
pub const PERCENT_SCALE: u32 = 2;

/// Round to 2 decimal places, half away from zero.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert a decimal into an integer at `scale`, rounding half away from zero.
///
/// Returns `None` when the scaled value does not fit into `i64`.
pub fn to_scaled(value: Decimal, scale: u32) -> Option<i64> {
    let rounded = value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
    let factor = Decimal::from(10i64.checked_pow(scale)?);
    rounded.checked_mul(factor)?.to_i64()
}

/// Inverse of [`to_scaled`].
pub fn from_scaled(value: i64, scale: u32) -> Decimal {
    Decimal::new(value, scale)
}
