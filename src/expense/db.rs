//! Database operations for expenses.

use rusqlite::{Connection, Row, named_params};
use rust_decimal::Decimal;
use time::Date;

use crate::{
    Error,
    auth::UserID,
    category::CategoryName,
    db::get_decimal,
    expense::{Expense, ExpenseId, NewExpense},
};

/// Store a new expense for `user_id`.
///
/// # Errors
///
/// Returns an [Error::SqlError] if `user_id` does not refer to a user or
/// some other SQL error occurred.
pub fn create_expense(
    expense: NewExpense,
    user_id: UserID,
    connection: &Connection,
) -> Result<Expense, Error> {
    connection.execute(
        "INSERT INTO expense (date, category, amount, destination, notes, user_id)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        (
            expense.date,
            expense.category.as_ref(),
            expense.amount.to_string(),
            &expense.destination,
            &expense.notes,
            user_id.as_i64(),
        ),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Expense {
        id,
        date: expense.date,
        category: expense.category,
        amount: expense.amount,
        destination: expense.destination,
        notes: expense.notes,
        user_id,
    })
}

/// Retrieve an expense owned by `user_id`.
///
/// # Errors
///
/// Returns [Error::NotFound] if there is no such expense or it belongs to another user.
pub fn get_expense(
    expense_id: ExpenseId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Expense, Error> {
    connection
        .prepare(
            "SELECT id, date, category, amount, destination, notes, user_id FROM expense
            WHERE id = :id AND user_id = :user_id",
        )?
        .query_row(
            named_params! {":id": expense_id, ":user_id": user_id.as_i64()},
            map_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve all of a user's expenses ordered by date.
pub fn get_expenses(user_id: UserID, connection: &Connection) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(
            "SELECT id, date, category, amount, destination, notes, user_id FROM expense
            WHERE user_id = :user_id
            ORDER BY date ASC, id ASC",
        )?
        .query_map(named_params! {":user_id": user_id.as_i64()}, map_row)?
        .map(|maybe_expense| maybe_expense.map_err(Error::from))
        .collect()
}

/// Retrieve a user's expenses dated from `start` to `end` inclusive, ordered by date.
///
/// The caller should check that `start` is not after `end`.
pub fn get_expenses_in_date_range(
    user_id: UserID,
    start: Date,
    end: Date,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(
            "SELECT id, date, category, amount, destination, notes, user_id FROM expense
            WHERE user_id = :user_id AND date BETWEEN :start AND :end
            ORDER BY date ASC, id ASC",
        )?
        .query_map(
            named_params! {":user_id": user_id.as_i64(), ":start": start, ":end": end},
            map_row,
        )?
        .map(|maybe_expense| maybe_expense.map_err(Error::from))
        .collect()
}

/// Retrieve a user's expenses with an amount from `min` to `max` inclusive, ordered by date.
///
/// Amounts are stored as text, so the range is applied after loading the
/// user's expenses rather than in SQL.
pub fn get_expenses_in_value_range(
    user_id: UserID,
    min: Decimal,
    max: Decimal,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    let expenses = get_expenses(user_id, connection)?
        .into_iter()
        .filter(|expense| expense.amount >= min && expense.amount <= max)
        .collect();

    Ok(expenses)
}

/// Replace every field of an expense.
///
/// # Errors
///
/// Returns [Error::UpdateMissingExpense] if the user has no expense with `expense_id`.
pub fn update_expense(
    expense_id: ExpenseId,
    expense: NewExpense,
    user_id: UserID,
    connection: &Connection,
) -> Result<Expense, Error> {
    let rows_affected = connection.execute(
        "UPDATE expense
        SET date = ?1, category = ?2, amount = ?3, destination = ?4, notes = ?5
        WHERE id = ?6 AND user_id = ?7",
        (
            expense.date,
            expense.category.as_ref(),
            expense.amount.to_string(),
            &expense.destination,
            &expense.notes,
            expense_id,
            user_id.as_i64(),
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingExpense);
    }

    Ok(Expense {
        id: expense_id,
        date: expense.date,
        category: expense.category,
        amount: expense.amount,
        destination: expense.destination,
        notes: expense.notes,
        user_id,
    })
}

/// Delete an expense.
///
/// # Errors
///
/// Returns [Error::DeleteMissingExpense] if the user has no expense with `expense_id`.
pub fn delete_expense(
    expense_id: ExpenseId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM expense WHERE id = ?1 AND user_id = ?2",
        (expense_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingExpense);
    }

    Ok(())
}

pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS expense (
            id INTEGER PRIMARY KEY,
            date TEXT NOT NULL,
            category TEXT NOT NULL,
            amount TEXT NOT NULL,
            destination TEXT,
            notes TEXT,
            user_id INTEGER NOT NULL,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_expense_user_date ON expense(user_id, date);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    let raw_category: String = row.get(2)?;

    Ok(Expense {
        id: row.get(0)?,
        date: row.get(1)?,
        category: CategoryName::new_unchecked(&raw_category),
        amount: get_decimal(row, 3)?,
        destination: row.get(4)?,
        notes: row.get(5)?,
        user_id: UserID::new(row.get(6)?),
    })
}
