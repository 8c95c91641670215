//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/expenses/{expense_id}', use [format_endpoint].

/// The route to check that the server is up.
pub const HEALTH: &str = "/api/health";

/// The route for registering a new user.
pub const REGISTER: &str = "/api/auth/register";
/// The route for logging in a user and getting a bearer token.
pub const LOG_IN: &str = "/api/auth/login";

/// The route for the user the bearer token belongs to.
pub const CURRENT_USER: &str = "/api/users/me";
/// The route for administrators to list all users.
pub const ADMIN_USERS: &str = "/api/users/admin";
/// The route for administrators to delete a user.
pub const ADMIN_USER: &str = "/api/users/admin/{user_id}";

/// The route to create and list categories.
pub const CATEGORIES: &str = "/api/categories";
/// The route to get, update and delete a category.
pub const CATEGORY: &str = "/api/categories/{category_id}";

/// The route to create and list expenses.
pub const EXPENSES: &str = "/api/expenses";
/// The route to get, update and delete an expense.
pub const EXPENSE: &str = "/api/expenses/{expense_id}";
/// The route to list expenses between two dates.
pub const EXPENSES_BY_DATE: &str = "/api/expenses/date_range";
/// The route to list expenses between two amounts.
pub const EXPENSES_BY_VALUE: &str = "/api/expenses/value_range";
/// The route for the monthly expense bar chart.
pub const EXPENSES_MONTHLY_CHART: &str = "/api/expenses/charts/monthly";
/// The route for the expense by category pie chart.
pub const EXPENSES_CATEGORY_CHART: &str = "/api/expenses/charts/category";

/// The route to create and list incomes.
pub const INCOMES: &str = "/api/incomes";
/// The route to get, update and delete an income.
pub const INCOME: &str = "/api/incomes/{income_id}";
/// The route to list incomes between two dates.
pub const INCOMES_BY_DATE: &str = "/api/incomes/date_range";
/// The route to list incomes between two amounts.
pub const INCOMES_BY_VALUE: &str = "/api/incomes/value_range";
/// The route for the monthly income bar chart.
pub const INCOMES_MONTHLY_CHART: &str = "/api/incomes/charts/monthly";
/// The route for the income by category pie chart.
pub const INCOMES_CATEGORY_CHART: &str = "/api/incomes/charts/category";

/// The route to create and list budgets.
pub const BUDGETS: &str = "/api/budgets";
/// The route to get, update and delete a budget.
pub const BUDGET: &str = "/api/budgets/{budget_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// If `endpoint_path` does not contain a parameter, it is returned unchanged.
///
/// # Examples
///
/// ```
/// use finance_manager::endpoints::{self, format_endpoint};
///
/// assert_eq!(format_endpoint(endpoints::EXPENSE, 1), "/api/expenses/1");
/// ```
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.char_indices() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
