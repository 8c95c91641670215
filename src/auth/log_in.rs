//! This file defines the route for handling log-in requests.
//! The token module handles the lower level token creation and verification.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;

use crate::{
    AppState, Error,
    auth::{TokenConfig, User, encode_token, get_user_by_email},
    db::lock_connection,
};

/// The state needed to perform a login.
#[derive(Clone)]
pub struct LoginState {
    /// The keys and duration for issuing tokens.
    pub token_config: TokenConfig,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LoginState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            token_config: state.token_config.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The raw data entered by the user when logging in.
///
/// The password is stored as a plain string. There is no need for validation here since
/// it will be compared against the password in the database, which has been verified.
#[derive(Clone, Serialize, Deserialize)]
pub struct LogInData {
    /// Email entered during log-in.
    pub email: String,
    /// Password entered during log-in.
    pub password: String,
}

/// The token returned on a successful log-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogInResponse {
    /// The bearer token to send in the `Authorization` header.
    pub token: String,
    /// Always "Bearer".
    pub token_type: String,
    /// When the token expires, formatted as RFC 3339.
    pub expires_at: String,
}

/// Handler for log-in requests via the POST method.
///
/// On a successful log-in request a bearer token for the user is returned.
///
/// # Errors
///
/// This function will return an error in a few situations.
/// - The email does not belong to a registered user.
/// - The password is not correct.
/// - An internal error occurred when verifying the password or signing the token.
pub async fn post_log_in(
    State(state): State<LoginState>,
    Json(user_data): Json<LogInData>,
) -> Result<Json<LogInResponse>, Error> {
    let user = verify_credentials(&user_data, &state.db_connection)?;

    let token = encode_token(user.id, &state.token_config)?;
    let expires_at = token
        .expires_at
        .format(&Rfc3339)
        .map_err(|error| Error::TokenCreation(error.to_string()))?;

    tracing::info!("User {} logged in", user.id);

    Ok(Json(LogInResponse {
        token: token.token,
        token_type: "Bearer".to_owned(),
        expires_at,
    }))
}

fn verify_credentials(
    user_data: &LogInData,
    db_connection: &Mutex<Connection>,
) -> Result<User, Error> {
    let user = find_user(&user_data.email, db_connection)?;

    let is_password_valid = user
        .password_hash
        .verify(&user_data.password)
        .map_err(|error| {
            tracing::error!("Unhandled error while verifying credentials: {error}");
            Error::HashingError(error.to_string())
        })?;

    if !is_password_valid {
        return Err(Error::InvalidCredentials);
    }

    Ok(user)
}

/// Look up the user logging in. The connection is unlocked again before the
/// password is checked.
fn find_user(email: &str, db_connection: &Mutex<Connection>) -> Result<User, Error> {
    let connection = lock_connection(db_connection)?;

    match get_user_by_email(email, &connection) {
        Ok(user) => Ok(user),
        Err(Error::NotFound) => Err(Error::InvalidCredentials),
        Err(error) => {
            tracing::error!("Unhandled error while verifying credentials: {error}");
            Err(error)
        }
    }
}
