//! Reading validation: a new reading must be strictly greater than the
//! previous one before any charge is computed.
//!
//! Readings are also bounded to what the store keeps exactly: at most
//! [`QUANTITY_SCALE`] decimal places and a scaled value that fits `i64`.

use rust_decimal::Decimal;

use crate::domain::{DomainError, DomainResult};
use crate::support::money::{to_scaled, QUANTITY_SCALE};

pub const MAX_METER_ID_LEN: usize = 64;
pub const MAX_SUBMITTED_BY_LEN: usize = 128;

/// Returns the consumption (`current - previous`) of a valid reading pair.
pub fn validate(previous: Decimal, current: Decimal) -> DomainResult<Decimal> {
    check_storable("previous_reading", previous)?;
    check_storable("current_reading", current)?;

    if current <= previous {
        return Err(DomainError::InvalidReadingOrder { previous, current });
    }
    if previous.is_sign_negative() && !previous.is_zero() {
        return Err(DomainError::Validation(format!(
            "previous reading must not be negative, got {}",
            previous
        )));
    }
    Ok(current - previous)
}

fn check_storable(field: &str, value: Decimal) -> DomainResult<()> {
    if value.normalize().scale() > QUANTITY_SCALE {
        return Err(DomainError::Validation(format!(
            "{} {} has more than {} decimal places",
            field, value, QUANTITY_SCALE
        )));
    }
    if to_scaled(value, QUANTITY_SCALE).is_none() {
        return Err(DomainError::Validation(format!(
            "{} {} is out of range",
            field, value
        )));
    }
    Ok(())
}

/// Checks the identifying fields of a submission and returns the trimmed
/// meter id.
pub fn validate_fields<'a>(
    account_id: i32,
    meter_id: &'a str,
    submitted_by: Option<&str>,
) -> DomainResult<&'a str> {
    if account_id < 1 {
        return Err(DomainError::Validation(format!(
            "account_id must be positive, got {}",
            account_id
        )));
    }
    let meter_id = meter_id.trim();
    if meter_id.is_empty() {
        return Err(DomainError::Validation("meter_id must not be empty".into()));
    }
    if meter_id.chars().count() > MAX_METER_ID_LEN {
        return Err(DomainError::Validation(format!(
            "meter_id must be at most {} characters",
            MAX_METER_ID_LEN
        )));
    }
    if submitted_by.is_some_and(|s| s.chars().count() > MAX_SUBMITTED_BY_LEN) {
        return Err(DomainError::Validation(format!(
            "submitted_by must be at most {} characters",
            MAX_SUBMITTED_BY_LEN
        )));
    }
    Ok(meter_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;
    use rust_decimal_macros::dec;

    #[test]
    fn increasing_reading_yields_consumption() {
        assert_eq!(validate(dec!(1200), dec!(1350)).unwrap(), dec!(150));
        assert_eq!(validate(dec!(0), dec!(0.125)).unwrap(), dec!(0.125));
        // trailing zeros do not count as precision
        assert_eq!(validate(dec!(1.5000), dec!(2.25000)).unwrap(), dec!(0.75));
    }

    #[test]
    fn equal_or_lower_reading_is_rejected() {
        for (prev, cur) in [
            (dec!(100), dec!(100)),
            (dec!(100), dec!(99.999)),
            (dec!(0), dec!(0)),
            (dec!(-5), dec!(-10)),
        ] {
            let err = validate(prev, cur).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidReadingOrder, "{} -> {}", prev, cur);
        }
    }

    #[test]
    fn negative_previous_reading_is_rejected() {
        let err = validate(dec!(-5), dec!(10)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn sub_thousandth_precision_is_rejected() {
        let err = validate(dec!(100.0001), dec!(100.0004)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("decimal places"));
    }

    #[test]
    fn unstorable_magnitudes_are_rejected() {
        let err = validate(dec!(0), Decimal::MAX - Decimal::ONE).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = validate(dec!(10000000000000000), dec!(10000000000000001)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("previous_reading"));

        // largest value the reading columns hold
        let max = Decimal::new(i64::MAX, QUANTITY_SCALE);
        assert_eq!(validate(max - Decimal::ONE, max).unwrap(), Decimal::ONE);
    }

    #[test]
    fn identifying_fields_are_bounded() {
        assert_eq!(validate_fields(1, "  MTR-1 ", None).unwrap(), "MTR-1");
        assert!(validate_fields(0, "MTR-1", None).is_err());
        assert!(validate_fields(1, "   ", None).is_err());
        assert!(validate_fields(1, &"M".repeat(65), None).is_err());
        let long = "a".repeat(129);
        let err = validate_fields(1, "MTR-1", Some(&long)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(validate_fields(1, "MTR-1", Some(&"a".repeat(128))).is_ok());
    }
}
