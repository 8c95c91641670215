//! Authentication middleware that validates bearer tokens before the route handlers run.

use std::sync::{Arc, Mutex};

use axum::{
    RequestPartsExt,
    extract::{FromRef, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::{Role, TokenConfig, UserID, get_user_by_id, token::decode_token},
    db::lock_connection,
};

/// The state needed for the auth middleware
#[derive(Clone)]
pub struct AuthState {
    /// The keys for verifying tokens.
    pub token_config: TokenConfig,
    /// The database connection for checking that the token's user still exists.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            token_config: state.token_config.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Middleware function that checks for a valid bearer token in the `Authorization` header.
///
/// The user ID and role are placed into the request and then the request executed normally if
/// the token is valid, otherwise a 401 Unauthorized JSON error is returned.
///
/// **Note**: Route handlers can use the function argument `Extension(user_id): Extension<UserID>` to receive the user ID.
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    let (mut parts, body) = request.into_parts();

    let bearer = match parts.extract::<TypedHeader<Authorization<Bearer>>>().await {
        Ok(TypedHeader(Authorization(bearer))) => bearer,
        Err(rejection) if rejection.is_missing() => return Error::MissingToken.into_response(),
        Err(rejection) => {
            tracing::debug!("Could not parse authorization header: {rejection}");
            return Error::InvalidToken.into_response();
        }
    };

    let claims = match decode_token(bearer.token(), &state.token_config) {
        Ok(claims) => claims,
        Err(error) => {
            tracing::debug!("Rejected bearer token: {error}");
            return error.into_response();
        }
    };

    let role = match lookup_role(claims.sub, &state.db_connection) {
        Ok(role) => role,
        Err(Error::NotFound) => {
            tracing::warn!("Token for user {} who no longer exists", claims.sub);
            return Error::InvalidToken.into_response();
        }
        Err(error) => return error.into_response(),
    };

    parts.extensions.insert(claims.sub);
    parts.extensions.insert(role);
    let request = Request::from_parts(parts, body);

    next.run(request).await
}

/// Middleware function that only lets administrators through.
///
/// **Note**: This middleware must run after [auth_guard], which puts the user's role into the request.
pub async fn admin_guard(request: Request, next: Next) -> Response {
    match request.extensions().get::<Role>() {
        Some(Role::Admin) => next.run(request).await,
        Some(Role::User) => Error::Forbidden.into_response(),
        None => {
            tracing::error!("admin_guard ran without a role in the request, is auth_guard missing?");
            Error::MissingToken.into_response()
        }
    }
}

fn lookup_role(user_id: UserID, db_connection: &Mutex<Connection>) -> Result<Role, Error> {
    let connection = lock_connection(db_connection)?;

    get_user_by_id(user_id, &connection).map(|user| user.role)
}
