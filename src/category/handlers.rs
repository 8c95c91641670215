//! Endpoints for creating, listing, editing and deleting categories.

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
    category::{
        Category, CategoryForm, CategoryId, CategoryKind, CategoryName,
        db::{create_category, delete_category, get_categories, get_category, update_category},
    },
    db::lock_connection,
    validation::require,
};

/// The state needed by the category endpoints.
#[derive(Debug, Clone)]
pub struct CategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Optional filter for listing categories.
#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    pub kind: Option<CategoryKind>,
}

fn parse_form(form: CategoryForm) -> Result<(CategoryName, CategoryKind), Error> {
    let name = CategoryName::new(&require(form.name, "name")?)?;
    let kind = require(form.kind, "kind")?;

    Ok((name, kind))
}

/// Create a category for the current user.
pub async fn create_category_endpoint(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserID>,
    Json(form): Json<CategoryForm>,
) -> Result<(StatusCode, Json<Category>), Error> {
    let (name, kind) = parse_form(form)?;
    let connection = lock_connection(&state.db_connection)?;

    let category = create_category(name, kind, user_id, &connection)?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// List the current user's categories.
pub async fn list_categories_endpoint(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<Vec<Category>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_categories(user_id, query.kind, &connection).map(Json)
}

pub async fn get_category_endpoint(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserID>,
    Path(category_id): Path<CategoryId>,
) -> Result<Json<Category>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_category(category_id, user_id, &connection).map(Json)
}

/// Replace a category's name and kind.
pub async fn update_category_endpoint(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserID>,
    Path(category_id): Path<CategoryId>,
    Json(form): Json<CategoryForm>,
) -> Result<Json<Category>, Error> {
    let (name, kind) = parse_form(form)?;
    let connection = lock_connection(&state.db_connection)?;

    update_category(category_id, name, kind, user_id, &connection).map(Json)
}

/// Delete a category and the budgets that use it.
pub async fn delete_category_endpoint(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserID>,
    Path(category_id): Path<CategoryId>,
) -> Result<StatusCode, Error> {
    let connection = lock_connection(&state.db_connection)?;

    delete_category(category_id, user_id, &connection)?;
    tracing::debug!("User {user_id} deleted category {category_id}");

    Ok(StatusCode::NO_CONTENT)
}
