//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Json, Router,
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde_json::json;

use crate::{
    AppState, Error,
    auth::{
        admin_guard, auth_guard, delete_current_user, delete_user_endpoint, get_current_user,
        list_users, post_log_in, register_user,
    },
    budget::{
        create_budget_endpoint, delete_budget_endpoint, get_budget_endpoint,
        list_budgets_endpoint, update_budget_endpoint,
    },
    category::{
        create_category_endpoint, delete_category_endpoint, get_category_endpoint,
        list_categories_endpoint, update_category_endpoint,
    },
    endpoints,
    expense::{
        category_expense_chart_endpoint, create_expense_endpoint, delete_expense_endpoint,
        expenses_in_date_range_endpoint, expenses_in_value_range_endpoint, get_expense_endpoint,
        list_expenses_endpoint, monthly_expense_chart_endpoint, update_expense_endpoint,
    },
    income::{
        category_income_chart_endpoint, create_income_endpoint, delete_income_endpoint,
        get_income_endpoint, incomes_in_date_range_endpoint, incomes_in_value_range_endpoint,
        list_incomes_endpoint, monthly_income_chart_endpoint, update_income_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::HEALTH, get(get_health))
        .route(endpoints::REGISTER, post(register_user))
        .route(endpoints::LOG_IN, post(post_log_in));

    let admin_routes = Router::new()
        .route(endpoints::ADMIN_USERS, get(list_users))
        .route(endpoints::ADMIN_USER, delete(delete_user_endpoint))
        .route_layer(middleware::from_fn(admin_guard));

    let protected_routes = Router::new()
        .route(
            endpoints::CURRENT_USER,
            get(get_current_user).delete(delete_current_user),
        )
        .route(
            endpoints::CATEGORIES,
            post(create_category_endpoint).get(list_categories_endpoint),
        )
        .route(
            endpoints::CATEGORY,
            get(get_category_endpoint)
                .put(update_category_endpoint)
                .delete(delete_category_endpoint),
        )
        .route(
            endpoints::EXPENSES,
            post(create_expense_endpoint).get(list_expenses_endpoint),
        )
        .route(
            endpoints::EXPENSE,
            get(get_expense_endpoint)
                .put(update_expense_endpoint)
                .delete(delete_expense_endpoint),
        )
        .route(
            endpoints::EXPENSES_BY_DATE,
            get(expenses_in_date_range_endpoint),
        )
        .route(
            endpoints::EXPENSES_BY_VALUE,
            get(expenses_in_value_range_endpoint),
        )
        .route(
            endpoints::EXPENSES_MONTHLY_CHART,
            get(monthly_expense_chart_endpoint),
        )
        .route(
            endpoints::EXPENSES_CATEGORY_CHART,
            get(category_expense_chart_endpoint),
        )
        .route(
            endpoints::INCOMES,
            post(create_income_endpoint).get(list_incomes_endpoint),
        )
        .route(
            endpoints::INCOME,
            get(get_income_endpoint)
                .put(update_income_endpoint)
                .delete(delete_income_endpoint),
        )
        .route(
            endpoints::INCOMES_BY_DATE,
            get(incomes_in_date_range_endpoint),
        )
        .route(
            endpoints::INCOMES_BY_VALUE,
            get(incomes_in_value_range_endpoint),
        )
        .route(
            endpoints::INCOMES_MONTHLY_CHART,
            get(monthly_income_chart_endpoint),
        )
        .route(
            endpoints::INCOMES_CATEGORY_CHART,
            get(category_income_chart_endpoint),
        )
        .route(
            endpoints::BUDGETS,
            post(create_budget_endpoint).get(list_budgets_endpoint),
        )
        .route(
            endpoints::BUDGET,
            get(get_budget_endpoint)
                .put(update_budget_endpoint)
                .delete(delete_budget_endpoint),
        )
        .merge(admin_routes)
        // Must wrap the admin guard, which reads the role added by the auth guard.
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

async fn get_health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn get_404_not_found() -> Response {
    Error::NotFound.into_response()
}
