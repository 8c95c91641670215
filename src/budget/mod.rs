//! Monthly spending limits per category.

mod db;
mod domain;
mod handlers;

pub use db::{
    create_budget, create_budget_table, delete_budget, find_budget_id, get_budget, get_budgets,
    update_budget,
};
pub use domain::{Budget, BudgetForm, BudgetId, NewBudget};
pub use handlers::{
    BudgetState, create_budget_endpoint, delete_budget_endpoint, get_budget_endpoint,
    list_budgets_endpoint, update_budget_endpoint,
};
