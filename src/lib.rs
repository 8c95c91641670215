//! A JSON REST API for managing personal finances.
//!
//! Users register and log in to get a bearer token, then record their
//! expenses and incomes, group them into categories, set monthly budgets per
//! category and request chart data that sums their spending by month or by
//! category.
//!
//! The data is stored in a single SQLite database.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod auth;
mod budget;
mod category;
mod chart;
mod db;
pub mod endpoints;
mod error;
mod expense;
mod income;
mod logging;
mod period;
mod range;
mod routing;
mod validation;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::{
    DEFAULT_TOKEN_DURATION, NewUser, PasswordHash, Role, User, UserID, ValidatedPassword,
    create_user, get_user_by_email, set_user_role, token_duration_from_hours, update_password,
};
pub use budget::{Budget, NewBudget, create_budget};
pub use category::{Category, CategoryKind, CategoryName, create_category};
pub use db::initialize as initialize_db;
pub use error::Error;
pub use expense::{Expense, NewExpense, create_expense};
pub use income::{Income, NewIncome, create_income};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use period::Period;
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
