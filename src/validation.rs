//! Validation rules shared by the request handlers.

use rust_decimal::Decimal;
use time::Date;

use crate::{Error, period::Period};

/// Return the value of a required request field, or [Error::MissingField] if it is absent.
pub fn require<T>(value: Option<T>, field: &'static str) -> Result<T, Error> {
    value.ok_or(Error::MissingField(field))
}

/// Validates that an amount is positive (greater than 0).
pub fn validate_positive_amount(amount: Decimal) -> Result<Decimal, Error> {
    if amount <= Decimal::ZERO {
        return Err(Error::NonPositiveAmount);
    }

    Ok(amount)
}

/// Validates that `start` is not after `end`. Both ends of the range are inclusive.
pub fn validate_date_range(start: Date, end: Date) -> Result<(), Error> {
    if start > end {
        return Err(Error::InvalidDateRange { start, end });
    }

    Ok(())
}

/// Validates that the month `start` is not after the month `end`.
pub fn validate_period_range(start: Period, end: Period) -> Result<(), Error> {
    if start > end {
        return Err(Error::InvalidPeriodRange { start, end });
    }

    Ok(())
}

/// Validates that both bounds are positive and that `min` is not greater than `max`.
pub fn validate_value_range(min: Decimal, max: Decimal) -> Result<(), Error> {
    validate_positive_amount(min)?;
    validate_positive_amount(max)?;

    if min > max {
        return Err(Error::InvalidValueRange);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use time::{Month, macros::date};

    use crate::{Error, period::Period};

    use super::{
        require, validate_date_range, validate_period_range, validate_positive_amount,
        validate_value_range,
    };

    #[test]
    fn require_reports_field_name() {
        assert_eq!(require::<i32>(None, "amount"), Err(Error::MissingField("amount")));
        assert_eq!(require(Some(1), "amount"), Ok(1));
    }

    #[test]
    fn zero_and_negative_amounts_are_rejected() {
        assert_eq!(validate_positive_amount(dec!(0)), Err(Error::NonPositiveAmount));
        assert_eq!(validate_positive_amount(dec!(-0.01)), Err(Error::NonPositiveAmount));
        assert_eq!(validate_positive_amount(dec!(0.01)), Ok(dec!(0.01)));
    }

    #[test]
    fn inverted_date_range_is_rejected() {
        let start = date!(2024 - 05 - 02);
        let end = date!(2024 - 05 - 01);

        assert_eq!(
            validate_date_range(start, end),
            Err(Error::InvalidDateRange { start, end })
        );
        assert_eq!(validate_date_range(end, end), Ok(()));
    }

    #[test]
    fn inverted_period_range_is_rejected() {
        let start = Period::new(2024, Month::June);
        let end = Period::new(2024, Month::May);

        assert_eq!(
            validate_period_range(start, end),
            Err(Error::InvalidPeriodRange { start, end })
        );
        assert_eq!(validate_period_range(end, start), Ok(()));
    }

    #[test]
    fn value_range_rules() {
        assert_eq!(validate_value_range(dec!(10), dec!(5)), Err(Error::InvalidValueRange));
        assert_eq!(validate_value_range(dec!(0), dec!(5)), Err(Error::NonPositiveAmount));
        assert_eq!(validate_value_range(dec!(1), dec!(-5)), Err(Error::NonPositiveAmount));
        assert_eq!(validate_value_range(dec!(5), dec!(5)), Ok(()));
    }
}
