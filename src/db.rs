//! Creates the application's database tables and holds helpers shared by the
//! per-model queries.

use std::{
    str::FromStr,
    sync::{Mutex, MutexGuard},
};

use rusqlite::{Connection, Row, TransactionBehavior, types::Type};
use rust_decimal::Decimal;

use crate::{
    Error,
    auth::create_user_table,
    budget::create_budget_table,
    category::create_category_table,
    expense::create_expense_table,
    income::create_income_table,
};

/// Create all of the application's tables if they do not exist yet.
///
/// Foreign key enforcement is turned on for `connection`, which means
/// deleting a user deletes everything the user owns.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = rusqlite::Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_category_table(&transaction)?;
    create_expense_table(&transaction)?;
    create_income_table(&transaction)?;
    create_budget_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Acquire the shared database connection for a request handler.
pub(crate) fn lock_connection(
    db_connection: &Mutex<Connection>,
) -> Result<MutexGuard<'_, Connection>, Error> {
    db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })
}

/// Read a decimal stored as text from the column at `index`.
pub(crate) fn get_decimal(row: &Row, index: usize) -> Result<Decimal, rusqlite::Error> {
    let text: String = row.get(index)?;

    Decimal::from_str(&text)
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(error)))
}

/// Whether `error` was caused by a UNIQUE constraint.
pub(crate) fn is_unique_violation(error: &rusqlite::Error) -> bool {
    // Code 2067 occurs when a UNIQUE constraint failed.
    matches!(
        error,
        rusqlite::Error::SqliteFailure(sql_error, _) if sql_error.extended_code == 2067
    )
}
