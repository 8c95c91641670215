//! Income types and the validation of income requests.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    auth::UserID,
    category::CategoryName,
    validation::{require, validate_positive_amount},
};

/// Database identifier for an income.
pub type IncomeId = i64;

/// Money that a user received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Income {
    pub id: IncomeId,
    /// The day the money was received.
    pub date: Date,
    /// A label for grouping incomes, e.g. "Salary".
    pub category: CategoryName,
    /// How much was received, always greater than zero.
    pub amount: Decimal,
    /// Where the money came from, e.g. an employer.
    pub source: Option<String>,
    pub notes: Option<String>,
    pub user_id: UserID,
}

/// Request body for creating and replacing an income.
///
/// Every field is optional so that missing fields are reported with a
/// helpful message instead of a generic deserialization error.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct IncomeForm {
    pub date: Option<Date>,
    pub category: Option<String>,
    pub amount: Option<Decimal>,
    pub source: Option<String>,
    pub notes: Option<String>,
}

/// A validated income that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewIncome {
    pub date: Date,
    pub category: CategoryName,
    pub amount: Decimal,
    pub source: Option<String>,
    pub notes: Option<String>,
}

impl TryFrom<IncomeForm> for NewIncome {
    type Error = Error;

    fn try_from(form: IncomeForm) -> Result<Self, Self::Error> {
        let amount = validate_positive_amount(require(form.amount, "amount")?)?;
        let date = require(form.date, "date")?;
        let category = CategoryName::new(&require(form.category, "category")?)?;

        Ok(Self {
            date,
            category,
            amount,
            source: form.source,
            notes: form.notes,
        })
    }
}
