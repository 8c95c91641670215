//! Incomes: money a user received, with date and category filters and chart data.

mod db;
mod domain;
mod handlers;

pub use db::{
    create_income, create_income_table, delete_income, get_income, get_incomes,
    get_incomes_in_date_range, get_incomes_in_value_range, update_income,
};
pub use domain::{Income, IncomeForm, IncomeId, NewIncome};
pub use handlers::{
    IncomeState, category_income_chart_endpoint, create_income_endpoint,
    delete_income_endpoint, incomes_in_date_range_endpoint, incomes_in_value_range_endpoint,
    get_income_endpoint, list_incomes_endpoint, monthly_income_chart_endpoint,
    update_income_endpoint,
};
