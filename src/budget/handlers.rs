//! Budget endpoints.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::UserID,
    budget::{
        Budget, BudgetForm, BudgetId, NewBudget,
        db::{create_budget, delete_budget, get_budget, get_budgets, update_budget},
    },
    db::lock_connection,
    period::Period,
};

/// The state needed by the budget endpoints.
#[derive(Debug, Clone)]
pub struct BudgetState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for BudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BudgetQuery {
    /// Only list budgets for this month (`YYYY-MM`).
    pub period: Option<String>,
}

/// Create a budget for one of the current user's categories.
pub async fn create_budget_endpoint(
    State(state): State<BudgetState>,
    Extension(user_id): Extension<UserID>,
    Json(form): Json<BudgetForm>,
) -> Result<(StatusCode, Json<Budget>), Error> {
    let budget = NewBudget::try_from(form)?;
    let connection = lock_connection(&state.db_connection)?;

    let budget = create_budget(budget, user_id, &connection)?;
    tracing::debug!(
        "User {user_id} created budget {} for {} in {}",
        budget.id,
        budget.category.name,
        budget.period
    );

    Ok((StatusCode::CREATED, Json(budget)))
}

pub async fn list_budgets_endpoint(
    State(state): State<BudgetState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<BudgetQuery>,
) -> Result<Json<Vec<Budget>>, Error> {
    let period = query
        .period
        .map(|period| period.parse::<Period>())
        .transpose()?;
    let connection = lock_connection(&state.db_connection)?;

    get_budgets(user_id, period, &connection).map(Json)
}

pub async fn get_budget_endpoint(
    State(state): State<BudgetState>,
    Extension(user_id): Extension<UserID>,
    Path(budget_id): Path<BudgetId>,
) -> Result<Json<Budget>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_budget(budget_id, user_id, &connection).map(Json)
}

pub async fn update_budget_endpoint(
    State(state): State<BudgetState>,
    Extension(user_id): Extension<UserID>,
    Path(budget_id): Path<BudgetId>,
    Json(form): Json<BudgetForm>,
) -> Result<Json<Budget>, Error> {
    let budget = NewBudget::try_from(form)?;
    let connection = lock_connection(&state.db_connection)?;

    update_budget(budget_id, budget, user_id, &connection).map(Json)
}

pub async fn delete_budget_endpoint(
    State(state): State<BudgetState>,
    Extension(user_id): Extension<UserID>,
    Path(budget_id): Path<BudgetId>,
) -> Result<StatusCode, Error> {
    let connection = lock_connection(&state.db_connection)?;

    delete_budget(budget_id, user_id, &connection)?;

    Ok(StatusCode::NO_CONTENT)
}
