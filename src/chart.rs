//! Aggregation of expenses and incomes into chart data.
//!
//! Provides functions to sum amounts by month and by category. Both
//! aggregations are a single pass over the records followed by a sort on the
//! grouping key.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use serde::Serialize;
use time::Date;

use crate::{Error, period::Period};

/// The total for a single month in a bar chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotal {
    /// The month, e.g. "2024-01".
    pub period: Period,
    /// A human readable label for the month, e.g. "January 2024".
    pub label: String,
    /// The sum of all amounts in the month.
    pub total: Decimal,
}

/// Bar chart data: totals per month in chronological order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyChart {
    /// One entry for each month that has at least one record.
    pub months: Vec<MonthlyTotal>,
}

/// Pie chart data: totals per category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryChart {
    /// Category name to the sum of amounts, ordered by name.
    pub categories: BTreeMap<String, Decimal>,
}

/// Sums `entries` by month and returns the months in chronological order.
///
/// Each entry is the date and amount of a record. Entries outside of
/// `start..=end` are ignored.
///
/// # Errors
///
/// Returns [Error::TotalOverflow] if a month's total does not fit in a [Decimal].
pub fn monthly_totals<I>(entries: I, start: Period, end: Period) -> Result<MonthlyChart, Error>
where
    I: IntoIterator<Item = (Date, Decimal)>,
{
    let mut totals: HashMap<Period, Decimal> = HashMap::new();

    for (date, amount) in entries {
        let period = Period::from_date(date);

        if period < start || period > end {
            continue;
        }

        let total = totals.entry(period).or_insert(Decimal::ZERO);
        *total = add_amount(*total, amount)?;
    }

    let mut months: Vec<MonthlyTotal> = totals
        .into_iter()
        .map(|(period, total)| MonthlyTotal {
            period,
            label: period.label(),
            total,
        })
        .collect();
    months.sort_by_key(|month| month.period);

    Ok(MonthlyChart { months })
}

/// Sums `entries` by category name.
///
/// Each entry is the category and amount of a record.
///
/// # Errors
///
/// Returns [Error::TotalOverflow] if a category's total does not fit in a [Decimal].
pub fn category_totals<'a, I>(entries: I) -> Result<CategoryChart, Error>
where
    I: IntoIterator<Item = (&'a str, Decimal)>,
{
    let mut categories = BTreeMap::new();

    for (category, amount) in entries {
        let total = categories
            .entry(category.to_owned())
            .or_insert(Decimal::ZERO);
        *total = add_amount(*total, amount)?;
    }

    Ok(CategoryChart { categories })
}

fn add_amount(total: Decimal, amount: Decimal) -> Result<Decimal, Error> {
    total.checked_add(amount).ok_or(Error::TotalOverflow)
}


#[cfg(test)]
mod category_totals_tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use crate::Error;

    use super::category_totals;

    #[test]
    fn sums_by_category_ordered_by_name() {
        let entries = vec![
            ("Transport", dec!(3)),
            ("Food", dec!(10.10)),
            ("Transport", dec!(4)),
            ("Food", dec!(0.90)),
        ];

        let chart = category_totals(entries).unwrap();

        let got: Vec<_> = chart.categories.into_iter().collect();
        assert_eq!(
            got,
            vec![
                ("Food".to_owned(), dec!(11.00)),
                ("Transport".to_owned(), dec!(7)),
            ]
        );
    }

    #[test]
    fn total_too_large_is_an_error() {
        let entries = vec![("Rent", Decimal::MAX), ("Rent", Decimal::MAX)];

        assert_eq!(category_totals(entries), Err(Error::TotalOverflow));
    }
}
