//! Expense endpoints, including the chart data.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    chart::{CategoryChart, MonthlyChart, category_totals, monthly_totals},
    db::lock_connection,
    expense::{
        Expense, ExpenseForm, ExpenseId, NewExpense,
        db::{
            create_expense, delete_expense, get_expense, get_expenses, get_expenses_in_date_range,
            get_expenses_in_value_range, update_expense,
        },
    },
    range::{DateRangeQuery, PeriodRangeQuery, ValueRangeQuery},
};

/// The state needed by the expense endpoints.
#[derive(Debug, Clone)]
pub struct ExpenseState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Record an expense for the current user.
pub async fn create_expense_endpoint(
    State(state): State<ExpenseState>,
    Extension(user_id): Extension<UserID>,
    Json(form): Json<ExpenseForm>,
) -> Result<(StatusCode, Json<Expense>), Error> {
    let expense = NewExpense::try_from(form)?;
    let connection = lock_connection(&state.db_connection)?;

    let expense = create_expense(expense, user_id, &connection)?;
    tracing::debug!("User {user_id} created expense {}", expense.id);

    Ok((StatusCode::CREATED, Json(expense)))
}

pub async fn list_expenses_endpoint(
    State(state): State<ExpenseState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<Expense>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_expenses(user_id, &connection).map(Json)
}

pub async fn get_expense_endpoint(
    State(state): State<ExpenseState>,
    Extension(user_id): Extension<UserID>,
    Path(expense_id): Path<ExpenseId>,
) -> Result<Json<Expense>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_expense(expense_id, user_id, &connection).map(Json)
}

/// Replace an expense with the request body.
pub async fn update_expense_endpoint(
    State(state): State<ExpenseState>,
    Extension(user_id): Extension<UserID>,
    Path(expense_id): Path<ExpenseId>,
    Json(form): Json<ExpenseForm>,
) -> Result<Json<Expense>, Error> {
    let expense = NewExpense::try_from(form)?;
    let connection = lock_connection(&state.db_connection)?;

    update_expense(expense_id, expense, user_id, &connection).map(Json)
}

pub async fn delete_expense_endpoint(
    State(state): State<ExpenseState>,
    Extension(user_id): Extension<UserID>,
    Path(expense_id): Path<ExpenseId>,
) -> Result<StatusCode, Error> {
    let connection = lock_connection(&state.db_connection)?;

    delete_expense(expense_id, user_id, &connection)?;

    Ok(StatusCode::NO_CONTENT)
}

/// List the expenses dated within `start..=end`.
pub async fn expenses_in_date_range_endpoint(
    State(state): State<ExpenseState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<Vec<Expense>>, Error> {
    let (start, end) = query.validate()?;
    let connection = lock_connection(&state.db_connection)?;

    get_expenses_in_date_range(user_id, start, end, &connection).map(Json)
}

/// List the expenses with an amount within `min..=max`.
pub async fn expenses_in_value_range_endpoint(
    State(state): State<ExpenseState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<ValueRangeQuery>,
) -> Result<Json<Vec<Expense>>, Error> {
    let (min, max) = query.validate()?;
    let connection = lock_connection(&state.db_connection)?;

    get_expenses_in_value_range(user_id, min, max, &connection).map(Json)
}

/// Bar chart data: the total spent in each month from `start` to `end`.
pub async fn monthly_expense_chart_endpoint(
    State(state): State<ExpenseState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<PeriodRangeQuery>,
) -> Result<Json<MonthlyChart>, Error> {
    let (start, end) = query.validate()?;
    let expenses = {
        let connection = lock_connection(&state.db_connection)?;
        get_expenses_in_date_range(user_id, start.first_day(), end.last_day(), &connection)?
    };

    let chart = monthly_totals(
        expenses.iter().map(|expense| (expense.date, expense.amount)),
        start,
        end,
    )?;

    Ok(Json(chart))
}

/// Pie chart data: the total spent in each category between two dates.
pub async fn category_expense_chart_endpoint(
    State(state): State<ExpenseState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<CategoryChart>, Error> {
    let (start, end) = query.validate()?;
    let expenses = {
        let connection = lock_connection(&state.db_connection)?;
        get_expenses_in_date_range(user_id, start, end, &connection)?
    };

    let chart = category_totals(
        expenses
            .iter()
            .map(|expense| (expense.category.as_ref(), expense.amount)),
    )?;

    Ok(Json(chart))
}

#[cfg(test)]
mod expense_handler_tests {
    use axum::{
        Router,
        http::StatusCode,
        middleware,
        routing::{get, post},
    };
    use axum_test::TestServer;
    use rust_decimal_macros::dec;
    use serde_json::json;

    use crate::{
        AppState,
        auth::{User, auth_guard},
        expense::Expense,
        test_utils::{get_test_app_state, get_test_token, insert_test_user},
    };

    use super::{
        category_expense_chart_endpoint, create_expense_endpoint, delete_expense_endpoint,
        expenses_in_date_range_endpoint, expenses_in_value_range_endpoint, get_expense_endpoint,
        list_expenses_endpoint, monthly_expense_chart_endpoint, update_expense_endpoint,
    };

    struct TestContext {
        server: TestServer,
        state: AppState,
        user: User,
        token: String,
    }

    fn get_test_context() -> TestContext {
        let state = get_test_app_state();
        let user = insert_test_user(&state.db_connection.lock().unwrap(), "jorge@gmail.com");
        let token = get_test_token(user.id, &state);

        let app = Router::new()
            .route(
                "/expenses",
                post(create_expense_endpoint).get(list_expenses_endpoint),
            )
            .route("/expenses/date_range", get(expenses_in_date_range_endpoint))
            .route("/expenses/value_range", get(expenses_in_value_range_endpoint))
            .route("/expenses/charts/monthly", get(monthly_expense_chart_endpoint))
            .route(
                "/expenses/charts/category",
                get(category_expense_chart_endpoint),
            )
            .route(
                "/expenses/{id}",
                get(get_expense_endpoint)
                    .put(update_expense_endpoint)
                    .delete(delete_expense_endpoint),
            )
            .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard))
            .with_state(state.clone());

        TestContext {
            server: TestServer::new(app),
            state,
            user,
            token,
        }
    }

    impl TestContext {
        async fn create(&self, date: &str, category: &str, amount: &str) -> Expense {
            let response = self
                .server
                .post("/expenses")
                .authorization_bearer(&self.token)
                .json(&json!({
                    "date": date,
                    "category": category,
                    "amount": amount,
                    "destination": "Supermercado",
                }))
                .await;
            response.assert_status(StatusCode::CREATED);
            response.json()
        }
    }

    #[tokio::test]
    async fn create_expense_returns_created_expense() {
        let context = get_test_context();

        let expense = context.create("2024-01-15", "Alimentacao", "100.50").await;

        assert_eq!(expense.amount, dec!(100.50));
        assert_eq!(expense.category.as_ref(), "Alimentacao");
        assert_eq!(expense.destination.as_deref(), Some("Supermercado"));
        assert_eq!(expense.user_id, context.user.id);
    }

    #[tokio::test]
    async fn create_expense_accepts_numeric_amount() {
        let context = get_test_context();

        let response = context
            .server
            .post("/expenses")
            .authorization_bearer(&context.token)
            .json(&json!({"date": "2024-01-15", "category": "Lazer", "amount": 25}))
            .await;

        response.assert_status(StatusCode::CREATED);
        assert_eq!(response.json::<Expense>().amount, dec!(25));
    }

    #[tokio::test]
    async fn create_expense_with_negative_amount_is_bad_request() {
        let context = get_test_context();

        let response = context
            .server
            .post("/expenses")
            .authorization_bearer(&context.token)
            .json(&json!({"date": "2024-01-15", "category": "Lazer", "amount": "-50"}))
            .await;

        response.assert_status_bad_request();
        response.assert_json(&json!({"error": "the amount must be greater than zero"}));
    }

    #[tokio::test]
    async fn create_expense_without_amount_is_bad_request() {
        let context = get_test_context();

        let response = context
            .server
            .post("/expenses")
            .authorization_bearer(&context.token)
            .json(&json!({"date": "2024-01-15", "category": "Lazer"}))
            .await;

        response.assert_status_bad_request();
        response.assert_json(&json!({"error": "the field \"amount\" is required"}));
    }

    #[tokio::test]
    async fn create_expense_without_token_is_unauthorized() {
        let context = get_test_context();

        let response = context
            .server
            .post("/expenses")
            .json(&json!({"date": "2024-01-15", "category": "Lazer", "amount": "1"}))
            .await;

        response.assert_status_unauthorized();
    }

    #[tokio::test]
    async fn list_expenses_without_any_returns_empty_list() {
        let context = get_test_context();

        let response = context
            .server
            .get("/expenses")
            .authorization_bearer(&context.token)
            .await;

        response.assert_status_ok();
        response.assert_json(&json!([]));
    }

    #[tokio::test]
    async fn other_users_expense_is_not_found() {
        let context = get_test_context();
        let expense = context.create("2024-01-15", "Alimentacao", "10").await;
        let other_user = insert_test_user(
            &context.state.db_connection.lock().unwrap(),
            "other@example.com",
        );

        let response = context
            .server
            .get(&format!("/expenses/{}", expense.id))
            .authorization_bearer(get_test_token(other_user.id, &context.state))
            .await;

        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn update_then_delete_expense() {
        let context = get_test_context();
        let expense = context.create("2024-01-15", "Alimentacao", "10").await;
        let path = format!("/expenses/{}", expense.id);

        let response = context
            .server
            .put(&path)
            .authorization_bearer(&context.token)
            .json(&json!({
                "date": "2024-01-20",
                "category": "Transporte",
                "amount": "30",
                "notes": "Taxi",
            }))
            .await;
        response.assert_status_ok();
        let updated = response.json::<Expense>();
        assert_eq!(updated.category.as_ref(), "Transporte");
        assert_eq!(updated.destination, None);
        assert_eq!(updated.notes.as_deref(), Some("Taxi"));

        context
            .server
            .delete(&path)
            .authorization_bearer(&context.token)
            .await
            .assert_status(StatusCode::NO_CONTENT);
        context
            .server
            .delete(&path)
            .authorization_bearer(&context.token)
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn date_range_filters_expenses() {
        let context = get_test_context();
        context.create("2023-12-31", "Alimentacao", "10").await;
        let january = context.create("2024-01-10", "Alimentacao", "20").await;

        let response = context
            .server
            .get("/expenses/date_range")
            .add_query_param("start", "2024-01-01")
            .add_query_param("end", "2024-01-31")
            .authorization_bearer(&context.token)
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Vec<Expense>>(), vec![january]);
    }

    #[tokio::test]
    async fn inverted_date_range_is_bad_request() {
        let context = get_test_context();

        let response = context
            .server
            .get("/expenses/date_range")
            .add_query_param("start", "2024-02-01")
            .add_query_param("end", "2024-01-01")
            .authorization_bearer(&context.token)
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn value_range_filters_expenses() {
        let context = get_test_context();
        context.create("2024-01-01", "Alimentacao", "5").await;
        let inside = context.create("2024-01-02", "Alimentacao", "50").await;
        context.create("2024-01-03", "Alimentacao", "500").await;

        let response = context
            .server
            .get("/expenses/value_range")
            .add_query_param("min", "10")
            .add_query_param("max", "100")
            .authorization_bearer(&context.token)
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Vec<Expense>>(), vec![inside]);
    }

    #[tokio::test]
    async fn non_positive_value_range_is_bad_request() {
        let context = get_test_context();

        let response = context
            .server
            .get("/expenses/value_range")
            .add_query_param("min", "0")
            .add_query_param("max", "100")
            .authorization_bearer(&context.token)
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn monthly_chart_sums_by_month() {
        let context = get_test_context();
        context.create("2024-01-05", "Alimentacao", "10.25").await;
        context.create("2024-01-20", "Transporte", "2.25").await;
        context.create("2024-03-01", "Alimentacao", "5").await;
        context.create("2024-04-01", "Alimentacao", "99").await;

        let response = context
            .server
            .get("/expenses/charts/monthly")
            .add_query_param("start", "2024-01")
            .add_query_param("end", "2024-03")
            .authorization_bearer(&context.token)
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "months": [
                {"period": "2024-01", "label": "January 2024", "total": "12.50"},
                {"period": "2024-03", "label": "March 2024", "total": "5"},
            ]
        }));
    }

    #[tokio::test]
    async fn monthly_chart_with_malformed_period_is_bad_request() {
        let context = get_test_context();

        let response = context
            .server
            .get("/expenses/charts/monthly")
            .add_query_param("start", "January")
            .add_query_param("end", "2024-03")
            .authorization_bearer(&context.token)
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn category_chart_sums_by_category() {
        let context = get_test_context();
        context.create("2024-01-05", "Transporte", "7").await;
        context.create("2024-01-06", "Alimentacao", "10").await;
        context.create("2024-01-07", "Alimentacao", "15.5").await;
        context.create("2024-02-01", "Lazer", "100").await;

        let response = context
            .server
            .get("/expenses/charts/category")
            .add_query_param("start", "2024-01-01")
            .add_query_param("end", "2024-01-31")
            .authorization_bearer(&context.token)
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "categories": {"Alimentacao": "25.5", "Transporte": "7"}
        }));
    }

    #[tokio::test]
    async fn chart_total_too_large_is_unprocessable_and_keeps_serving() {
        let context = get_test_context();
        context.create("2024-01-05", "Alimentacao", "79228162514264337593543950335").await;
        context.create("2024-01-06", "Alimentacao", "79228162514264337593543950335").await;

        let response = context
            .server
            .get("/expenses/charts/monthly")
            .add_query_param("start", "2024-01")
            .add_query_param("end", "2024-01")
            .authorization_bearer(&context.token)
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert!(!context.state.db_connection.is_poisoned());
        context
            .server
            .get("/expenses")
            .authorization_bearer(&context.token)
            .await
            .assert_status_ok();
    }
}
