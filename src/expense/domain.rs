//! Expense types and the validation of expense requests.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    auth::UserID,
    category::CategoryName,
    validation::{require, validate_positive_amount},
};

/// Database identifier for an expense.
pub type ExpenseId = i64;

/// Money that a user spent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    /// The day the money was spent.
    pub date: Date,
    /// A label for grouping expenses, e.g. "Groceries".
    pub category: CategoryName,
    /// How much was spent, always greater than zero.
    pub amount: Decimal,
    /// Who or what was paid.
    pub destination: Option<String>,
    pub notes: Option<String>,
    pub user_id: UserID,
}

/// Request body for creating and replacing an expense.
///
/// Every field is optional so that missing fields are reported with a
/// helpful message instead of a generic deserialization error.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ExpenseForm {
    pub date: Option<Date>,
    pub category: Option<String>,
    pub amount: Option<Decimal>,
    pub destination: Option<String>,
    pub notes: Option<String>,
}

/// A validated expense that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub date: Date,
    pub category: CategoryName,
    pub amount: Decimal,
    pub destination: Option<String>,
    pub notes: Option<String>,
}

impl TryFrom<ExpenseForm> for NewExpense {
    type Error = Error;

    fn try_from(form: ExpenseForm) -> Result<Self, Self::Error> {
        let amount = validate_positive_amount(require(form.amount, "amount")?)?;
        let date = require(form.date, "date")?;
        let category = CategoryName::new(&require(form.category, "category")?)?;

        Ok(Self {
            date,
            category,
            amount,
            destination: form.destination,
            notes: form.notes,
        })
    }
}
