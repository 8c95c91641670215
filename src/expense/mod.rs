//! Expenses: money a user spent, with date and category filters and chart data.

mod db;
mod domain;
mod handlers;

pub use db::{
    create_expense, create_expense_table, delete_expense, get_expense, get_expenses,
    get_expenses_in_date_range, get_expenses_in_value_range, update_expense,
};
pub use domain::{Expense, ExpenseForm, ExpenseId, NewExpense};
pub use handlers::{
    ExpenseState, category_expense_chart_endpoint, create_expense_endpoint,
    delete_expense_endpoint, expenses_in_date_range_endpoint, expenses_in_value_range_endpoint,
    get_expense_endpoint, list_expenses_endpoint, monthly_expense_chart_endpoint,
    update_expense_endpoint,
};
