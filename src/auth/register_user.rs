//! The endpoint for registering a new user.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use email_address::EmailAddress;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::{
        PasswordHash, Role, User, UserResponse, ValidatedPassword,
        user::{NewUser, create_user},
    },
    db::lock_connection,
};

/// The state needed for creating a new user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// The cost used when hashing passwords.
    pub password_hash_cost: u32,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            password_hash_cost: state.password_hash_cost,
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The raw data entered by the user when registering.
#[derive(Clone, Deserialize)]
pub struct RegisterForm {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// A route handler for creating a new user.
///
/// New users always get the role [Role::User]. Responds with 201 Created and
/// the new user on success.
///
/// # Errors
///
/// Responds with an error if:
/// - the username is missing or empty,
/// - the email is missing, invalid or already registered,
/// - or the password is missing or too weak.
pub async fn register_user(
    State(state): State<RegistrationState>,
    Json(form): Json<RegisterForm>,
) -> Response {
    match validate_and_create_user(form, &state) {
        Ok(user) => (StatusCode::CREATED, Json(UserResponse::from(user))).into_response(),
        Err(error) => error.into_response(),
    }
}

fn validate_and_create_user(
    form: RegisterForm,
    state: &RegistrationState,
) -> Result<User, Error> {
    let username = form
        .username
        .as_deref()
        .map(str::trim)
        .filter(|username| !username.is_empty())
        .ok_or(Error::EmptyUsername)?
        .to_owned();

    let raw_email = form.email.ok_or(Error::MissingField("email"))?;
    let raw_email = raw_email.trim();
    let email: EmailAddress = raw_email
        .parse()
        .map_err(|_| Error::InvalidEmail(raw_email.to_owned()))?;

    let raw_password = form.password.ok_or(Error::MissingField("password"))?;
    let password = ValidatedPassword::new(&raw_password, &[username.as_str(), email.as_str()])?;
    let password_hash = PasswordHash::new(password, state.password_hash_cost)?;

    let connection = lock_connection(&state.db_connection)?;

    let user = create_user(
        NewUser {
            username,
            email,
            password_hash,
            role: Role::User,
        },
        &connection,
    )?;

    tracing::info!("Registered user {}", user.id);

    Ok(user)
}

#[cfg(test)]
mod register_user_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, routing::post};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::json;

    use crate::{
        auth::{Role, UserResponse, get_user_by_email},
        db::initialize,
    };

    use super::{RegistrationState, register_user};

    fn get_test_server() -> (TestServer, RegistrationState) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let state = RegistrationState {
            password_hash_cost: 4,
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let app = Router::new()
            .route("/register", post(register_user))
            .with_state(state.clone());

        (TestServer::new(app), state)
    }

    #[tokio::test]
    async fn creates_user_with_user_role() {
        let (server, state) = get_test_server();

        let response = server
            .post("/register")
            .json(&json!({
                "username": "Jorge",
                "email": "jorge@gmail.com",
                "password": "correct horse battery staple",
            }))
            .await;

        response.assert_status(axum::http::StatusCode::CREATED);
        let user: UserResponse = response.json();
        assert_eq!(user.username, "Jorge");
        assert_eq!(user.email, "jorge@gmail.com");
        assert_eq!(user.role, Role::User);

        let connection = state.db_connection.lock().unwrap();
        let stored = get_user_by_email("jorge@gmail.com", &connection).unwrap();
        assert_eq!(stored.id, user.id);
        assert!(
            stored
                .password_hash
                .verify("correct horse battery staple")
                .unwrap()
        );
    }

    #[tokio::test]
    async fn rejects_empty_username() {
        let (server, _) = get_test_server();

        let response = server
            .post("/register")
            .json(&json!({
                "username": "   ",
                "email": "jorge@gmail.com",
                "password": "correct horse battery staple",
            }))
            .await;

        response.assert_status_bad_request();
        response.assert_json(&json!({"error": "username cannot be empty"}));
    }

    #[tokio::test]
    async fn rejects_invalid_email() {
        let (server, _) = get_test_server();

        let response = server
            .post("/register")
            .json(&json!({
                "username": "Jorge",
                "email": "not an email",
                "password": "correct horse battery staple",
            }))
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn rejects_weak_password() {
        let (server, _) = get_test_server();

        let response = server
            .post("/register")
            .json(&json!({
                "username": "Jorge",
                "email": "jorge@gmail.com",
                "password": "123456",
            }))
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn rejects_duplicate_email() {
        let (server, _) = get_test_server();
        let body = json!({
            "username": "Jorge",
            "email": "jorge@gmail.com",
            "password": "correct horse battery staple",
        });
        server.post("/register").json(&body).await;

        let response = server.post("/register").json(&body).await;

        response.assert_status(axum::http::StatusCode::CONFLICT);
    }
}
