//! Endpoints for the current user and for administrators managing users.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Path, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::{
        UserID, UserResponse,
        user::{delete_user, get_all_users, get_user_by_id},
    },
    db::lock_connection,
};

/// The state needed to read and delete users.
#[derive(Debug, Clone)]
pub struct UserState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UserState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Get the user the bearer token belongs to.
pub async fn get_current_user(
    State(state): State<UserState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<UserResponse>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_user_by_id(user_id, &connection).map(|user| Json(user.into()))
}

/// Delete the user the bearer token belongs to, along with all of their data.
pub async fn delete_current_user(
    State(state): State<UserState>,
    Extension(user_id): Extension<UserID>,
) -> Result<StatusCode, Error> {
    let connection = lock_connection(&state.db_connection)?;

    delete_user(user_id, &connection)?;
    tracing::info!("User {user_id} deleted their account");

    Ok(StatusCode::NO_CONTENT)
}

/// List every registered user. Only for administrators.
pub async fn list_users(
    State(state): State<UserState>,
) -> Result<Json<Vec<UserResponse>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    let users = get_all_users(&connection)?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    Ok(Json(users))
}

/// Delete any user by ID. Only for administrators.
pub async fn delete_user_endpoint(
    State(state): State<UserState>,
    Extension(admin_id): Extension<UserID>,
    Path(user_id): Path<i64>,
) -> Result<StatusCode, Error> {
    let connection = lock_connection(&state.db_connection)?;

    delete_user(UserID::new(user_id), &connection)?;
    tracing::info!("Admin {admin_id} deleted user {user_id}");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension, Json,
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;

    use crate::{
        Error,
        auth::{UserID, get_user_by_id},
        db::initialize,
        test_utils::insert_test_user,
    };

    use super::{
        UserState, delete_current_user, delete_user_endpoint, get_current_user, list_users,
    };

    fn get_state() -> UserState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        UserState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn get_current_user_returns_user_without_password() {
        let state = get_state();
        let user = insert_test_user(&state.db_connection.lock().unwrap(), "a@example.com");

        let Json(got) = get_current_user(State(state), Extension(user.id))
            .await
            .unwrap();

        assert_eq!(got.id, user.id);
        assert_eq!(got.email, "a@example.com");
    }

    #[tokio::test]
    async fn delete_current_user_removes_user() {
        let state = get_state();
        let user = insert_test_user(&state.db_connection.lock().unwrap(), "a@example.com");

        let status = delete_current_user(State(state.clone()), Extension(user.id))
            .await
            .unwrap();

        assert_eq!(status, StatusCode::NO_CONTENT);
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_user_by_id(user.id, &connection), Err(Error::NotFound));
    }

    #[tokio::test]
    async fn list_users_returns_all_users() {
        let state = get_state();
        {
            let connection = state.db_connection.lock().unwrap();
            insert_test_user(&connection, "a@example.com");
            insert_test_user(&connection, "b@example.com");
        }

        let Json(users) = list_users(State(state)).await.unwrap();

        let emails: Vec<_> = users.into_iter().map(|user| user.email).collect();
        assert_eq!(emails, vec!["a@example.com", "b@example.com"]);
    }

    #[tokio::test]
    async fn delete_missing_user_is_not_found() {
        let state = get_state();

        let result =
            delete_user_endpoint(State(state), Extension(UserID::new(1)), Path(404)).await;

        assert_eq!(result, Err(Error::DeleteMissingUser));
    }
}
