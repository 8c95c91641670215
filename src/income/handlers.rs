//! Income endpoints, including the chart data.

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
    income::{
        Income, IncomeForm, IncomeId, NewIncome,
        db::{
            create_income, delete_income, get_income, get_incomes, get_incomes_in_date_range,
            get_incomes_in_value_range, update_income,
        },
    },
    range::{DateRangeQuery, PeriodRangeQuery, ValueRangeQuery},
};

/// The state needed by the income endpoints.
#[derive(Debug, Clone)]
pub struct IncomeState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for IncomeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Record an income for the current user.
pub async fn create_income_endpoint(
    State(state): State<IncomeState>,
    Extension(user_id): Extension<UserID>,
    Json(form): Json<IncomeForm>,
) -> Result<(StatusCode, Json<Income>), Error> {
    let income = NewIncome::try_from(form)?;
    let connection = lock_connection(&state.db_connection)?;

    let income = create_income(income, user_id, &connection)?;
    tracing::debug!("User {user_id} created income {}", income.id);

    Ok((StatusCode::CREATED, Json(income)))
}

pub async fn list_incomes_endpoint(
    State(state): State<IncomeState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<Income>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_incomes(user_id, &connection).map(Json)
}

pub async fn get_income_endpoint(
    State(state): State<IncomeState>,
    Extension(user_id): Extension<UserID>,
    Path(income_id): Path<IncomeId>,
) -> Result<Json<Income>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_income(income_id, user_id, &connection).map(Json)
}

/// Replace an income with the request body.
pub async fn update_income_endpoint(
    State(state): State<IncomeState>,
    Extension(user_id): Extension<UserID>,
    Path(income_id): Path<IncomeId>,
    Json(form): Json<IncomeForm>,
) -> Result<Json<Income>, Error> {
    let income = NewIncome::try_from(form)?;
    let connection = lock_connection(&state.db_connection)?;

    update_income(income_id, income, user_id, &connection).map(Json)
}

pub async fn delete_income_endpoint(
    State(state): State<IncomeState>,
    Extension(user_id): Extension<UserID>,
    Path(income_id): Path<IncomeId>,
) -> Result<StatusCode, Error> {
    let connection = lock_connection(&state.db_connection)?;

    delete_income(income_id, user_id, &connection)?;

    Ok(StatusCode::NO_CONTENT)
}

/// List the incomes dated within `start..=end`.
pub async fn incomes_in_date_range_endpoint(
    State(state): State<IncomeState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<Vec<Income>>, Error> {
    let (start, end) = query.validate()?;
    let connection = lock_connection(&state.db_connection)?;

    get_incomes_in_date_range(user_id, start, end, &connection).map(Json)
}

/// List the incomes with an amount within `min..=max`.
pub async fn incomes_in_value_range_endpoint(
    State(state): State<IncomeState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<ValueRangeQuery>,
) -> Result<Json<Vec<Income>>, Error> {
    let (min, max) = query.validate()?;
    let connection = lock_connection(&state.db_connection)?;

    get_incomes_in_value_range(user_id, min, max, &connection).map(Json)
}

/// Bar chart data: the total received in each month from `start` to `end`.
pub async fn monthly_income_chart_endpoint(
    State(state): State<IncomeState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<PeriodRangeQuery>,
) -> Result<Json<MonthlyChart>, Error> {
    let (start, end) = query.validate()?;
    let incomes = {
        let connection = lock_connection(&state.db_connection)?;
        get_incomes_in_date_range(user_id, start.first_day(), end.last_day(), &connection)?
    };

    let chart = monthly_totals(
        incomes.iter().map(|income| (income.date, income.amount)),
        start,
        end,
    )?;

    Ok(Json(chart))
}

/// Pie chart data: the total received in each category between two dates.
pub async fn category_income_chart_endpoint(
    State(state): State<IncomeState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<CategoryChart>, Error> {
    let (start, end) = query.validate()?;
    let incomes = {
        let connection = lock_connection(&state.db_connection)?;
        get_incomes_in_date_range(user_id, start, end, &connection)?
    };

    let chart = category_totals(
        incomes
            .iter()
            .map(|income| (income.category.as_ref(), income.amount)),
    )?;

    Ok(Json(chart))
}
