//! Defines the app level error type and its conversion to JSON error responses.
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use time::Date;

use crate::period::Period;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The email and password combination did not match a registered user.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// An empty string was used as a username.
    #[error("username cannot be empty")]
    EmptyUsername,

    /// The string is not a valid email address.
    #[error("{0} is not a valid email address")]
    InvalidEmail(String),

    /// The email address is already used by another user.
    #[error("the email address is already registered")]
    DuplicateEmail,

    /// The request did not include a bearer token.
    #[error("missing authorization token")]
    MissingToken,

    /// The bearer token could not be decoded or its signature is invalid.
    #[error("invalid or malformed token")]
    InvalidToken,

    /// The bearer token has expired.
    #[error("token has expired")]
    TokenExpired,

    /// A token could not be created for a user.
    #[error("could not create token: {0}")]
    TokenCreation(String),

    /// The configured token lifetime in hours is out of range.
    #[error("the token duration must be between 1 and 8760 hours, got {0}")]
    InvalidTokenDuration(i64),

    /// The user is authenticated but is not allowed to access the resource.
    #[error("you do not have permission to access this resource")]
    Forbidden,

    /// A required field was not provided in the request.
    #[error("the field \"{0}\" is required")]
    MissingField(&'static str),

    /// A monetary value was zero or negative.
    #[error("the amount must be greater than zero")]
    NonPositiveAmount,

    /// The start date of a date range is after the end date.
    #[error("the start date {start} cannot be after the end date {end}")]
    InvalidDateRange {
        /// The first day of the range.
        start: Date,
        /// The last day of the range.
        end: Date,
    },

    /// The start month of a period range is after the end month.
    #[error("the start period {start} cannot be after the end period {end}")]
    InvalidPeriodRange {
        /// The first month of the range.
        start: Period,
        /// The last month of the range.
        end: Period,
    },

    /// The minimum of a value range is greater than the maximum.
    #[error("the minimum value cannot be greater than the maximum value")]
    InvalidValueRange,

    /// Summing the amounts for a chart exceeded the largest representable amount.
    #[error("the total of the selected amounts is too large to calculate")]
    TotalOverflow,

    /// A string could not be parsed as a `YYYY-MM` period.
    #[error("\"{0}\" is not a valid period, expected the format YYYY-MM")]
    InvalidPeriod(String),

    /// An empty string was used to create a category name.
    #[error("category name cannot be empty")]
    EmptyCategoryName,

    /// The user already has a category with the same name.
    #[error("the category \"{0}\" already exists")]
    DuplicateCategory(String),

    /// The user has no category with the given name.
    #[error("could not find a category named \"{0}\"")]
    CategoryNameNotFound(String),

    /// The user already has a budget for the category and period.
    #[error("a budget for the category \"{category}\" in {period} already exists")]
    DuplicateBudget {
        /// The category name.
        category: String,
        /// The budget's month.
        period: Period,
    },

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update an expense that does not exist
    #[error("tried to update an expense that is not in the database")]
    UpdateMissingExpense,

    /// Tried to delete an expense that does not exist
    #[error("tried to delete an expense that is not in the database")]
    DeleteMissingExpense,

    /// Tried to update an income that does not exist
    #[error("tried to update an income that is not in the database")]
    UpdateMissingIncome,

    /// Tried to delete an income that does not exist
    #[error("tried to delete an income that is not in the database")]
    DeleteMissingIncome,

    /// Tried to update a category that does not exist
    #[error("tried to update a category that is not in the database")]
    UpdateMissingCategory,

    /// Tried to delete a category that does not exist
    #[error("tried to delete a category that is not in the database")]
    DeleteMissingCategory,

    /// Tried to update a budget that does not exist
    #[error("tried to update a budget that is not in the database")]
    UpdateMissingBudget,

    /// Tried to delete a budget that does not exist
    #[error("tried to delete a budget that is not in the database")]
    DeleteMissingBudget,

    /// Tried to delete a user that does not exist
    #[error("tried to delete a user that is not in the database")]
    DeleteMissingUser,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    /// The HTTP status code that best describes the error to a client.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidCredentials
            | Error::MissingToken
            | Error::InvalidToken
            | Error::TokenExpired => StatusCode::UNAUTHORIZED,
            Error::Forbidden => StatusCode::FORBIDDEN,
            Error::TooWeak(_)
            | Error::EmptyUsername
            | Error::InvalidEmail(_)
            | Error::MissingField(_)
            | Error::NonPositiveAmount
            | Error::InvalidDateRange { .. }
            | Error::InvalidPeriodRange { .. }
            | Error::InvalidValueRange
            | Error::InvalidPeriod(_)
            | Error::EmptyCategoryName => StatusCode::BAD_REQUEST,
            Error::TotalOverflow => StatusCode::UNPROCESSABLE_ENTITY,
            Error::DuplicateEmail | Error::DuplicateCategory(_) | Error::DuplicateBudget { .. } => {
                StatusCode::CONFLICT
            }
            Error::NotFound
            | Error::CategoryNameNotFound(_)
            | Error::UpdateMissingExpense
            | Error::DeleteMissingExpense
            | Error::UpdateMissingIncome
            | Error::DeleteMissingIncome
            | Error::UpdateMissingCategory
            | Error::DeleteMissingCategory
            | Error::UpdateMissingBudget
            | Error::DeleteMissingBudget
            | Error::DeleteMissingUser => StatusCode::NOT_FOUND,
            Error::HashingError(_)
            | Error::TokenCreation(_)
            | Error::InvalidTokenDuration(_)
            | Error::SqlError(_)
            | Error::DatabaseLockError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Internal errors are not intended to be shown to the client.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("An unexpected error occurred: {}", self);
            "An unexpected error occurred, check the server logs for more details.".to_owned()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
