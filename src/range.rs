//! Query strings for filtering expenses and incomes by date, amount and month.

use rust_decimal::Decimal;
use serde::Deserialize;
use time::Date;

use crate::{
    Error,
    period::Period,
    validation::{require, validate_date_range, validate_period_range, validate_value_range},
};

/// `?start=YYYY-MM-DD&end=YYYY-MM-DD`, both inclusive.
#[derive(Debug, Default, Deserialize)]
pub struct DateRangeQuery {
    pub start: Option<Date>,
    pub end: Option<Date>,
}

impl DateRangeQuery {
    /// Check that both dates are given and in order.
    pub fn validate(self) -> Result<(Date, Date), Error> {
        let start = require(self.start, "start")?;
        let end = require(self.end, "end")?;
        validate_date_range(start, end)?;

        Ok((start, end))
    }
}

/// `?min=<amount>&max=<amount>`, both inclusive.
#[derive(Debug, Default, Deserialize)]
pub struct ValueRangeQuery {
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
}

impl ValueRangeQuery {
    /// Check that both amounts are given, positive and in order.
    pub fn validate(self) -> Result<(Decimal, Decimal), Error> {
        let min = require(self.min, "min")?;
        let max = require(self.max, "max")?;
        validate_value_range(min, max)?;

        Ok((min, max))
    }
}

/// `?start=YYYY-MM&end=YYYY-MM`, both inclusive.
///
/// The months are kept as text so that a malformed month is reported as
/// [Error::InvalidPeriod].
#[derive(Debug, Default, Deserialize)]
pub struct PeriodRangeQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl PeriodRangeQuery {
    /// Check that both months are given, well formed and in order.
    pub fn validate(self) -> Result<(Period, Period), Error> {
        let start: Period = require(self.start, "start")?.parse()?;
        let end: Period = require(self.end, "end")?.parse()?;
        validate_period_range(start, end)?;

        Ok((start, end))
    }
}
