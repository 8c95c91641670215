//! Budget types and the validation of budget requests.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    auth::UserID,
    category::{Category, CategoryName},
    period::Period,
    validation::{require, validate_positive_amount},
};

/// Database identifier for a budget.
pub type BudgetId = i64;

/// A spending limit for a category in one month.
///
/// A user has at most one budget per category and month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: BudgetId,
    pub category: Category,
    pub limit: Decimal,
    pub period: Period,
    pub user_id: UserID,
}

/// Request body for creating and replacing a budget.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct BudgetForm {
    /// The name of one of the user's categories.
    pub category: Option<String>,
    pub limit: Option<Decimal>,
    /// The month as `YYYY-MM`.
    pub period: Option<String>,
}

/// A validated budget request. The category has not been looked up yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBudget {
    pub category: CategoryName,
    pub limit: Decimal,
    pub period: Period,
}

impl TryFrom<BudgetForm> for NewBudget {
    type Error = Error;

    fn try_from(form: BudgetForm) -> Result<Self, Self::Error> {
        let category = CategoryName::new(&require(form.category, "category")?)?;
        let limit = validate_positive_amount(require(form.limit, "limit")?)?;
        let period = require(form.period, "period")?.parse()?;

        Ok(Self {
            category,
            limit,
            period,
        })
    }
}

#[cfg(test)]
mod new_budget_tests {
    use rust_decimal_macros::dec;
    use time::Month;

    use crate::{Error, category::CategoryName, period::Period};

    use super::{BudgetForm, NewBudget};

    fn valid_form() -> BudgetForm {
        BudgetForm {
            category: Some("Alimentacao".to_owned()),
            limit: Some(dec!(1000)),
            period: Some("2024-01".to_owned()),
        }
    }

    #[test]
    fn valid_form_succeeds() {
        assert_eq!(
            NewBudget::try_from(valid_form()),
            Ok(NewBudget {
                category: CategoryName::new_unchecked("Alimentacao"),
                limit: dec!(1000),
                period: Period::new(2024, Month::January),
            })
        );
    }

    #[test]
    fn zero_limit_fails() {
        let form = BudgetForm {
            limit: Some(dec!(0)),
            ..valid_form()
        };

        assert_eq!(NewBudget::try_from(form), Err(Error::NonPositiveAmount));
    }

    #[test]
    fn missing_category_fails() {
        let form = BudgetForm {
            category: None,
            ..valid_form()
        };

        assert_eq!(
            NewBudget::try_from(form),
            Err(Error::MissingField("category"))
        );
    }

    #[test]
    fn malformed_period_fails() {
        let form = BudgetForm {
            period: Some("01/2024".to_owned()),
            ..valid_form()
        };

        assert_eq!(
            NewBudget::try_from(form),
            Err(Error::InvalidPeriod("01/2024".to_owned()))
        );
    }
}
