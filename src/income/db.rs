//! Database operations for incomes.

use rusqlite::{Connection, Row, named_params};
use rust_decimal::Decimal;
use time::Date;

use crate::{
    Error,
    auth::UserID,
    category::CategoryName,
    db::get_decimal,
    income::{Income, IncomeId, NewIncome},
};

/// Store a new income for `user_id`.
pub fn create_income(
    income: NewIncome,
    user_id: UserID,
    connection: &Connection,
) -> Result<Income, Error> {
    connection.execute(
        "INSERT INTO income (date, category, amount, source, notes, user_id)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        (
            income.date,
            income.category.as_ref(),
            income.amount.to_string(),
            &income.source,
            &income.notes,
            user_id.as_i64(),
        ),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Income {
        id,
        date: income.date,
        category: income.category,
        amount: income.amount,
        source: income.source,
        notes: income.notes,
        user_id,
    })
}

/// Retrieve an income owned by `user_id`, or [Error::NotFound].
pub fn get_income(
    income_id: IncomeId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Income, Error> {
    connection
        .prepare(
            "SELECT id, date, category, amount, source, notes, user_id FROM income
            WHERE id = :id AND user_id = :user_id",
        )?
        .query_row(
            named_params! {":id": income_id, ":user_id": user_id.as_i64()},
            map_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve all of a user's incomes ordered by date.
pub fn get_incomes(user_id: UserID, connection: &Connection) -> Result<Vec<Income>, Error> {
    connection
        .prepare(
            "SELECT id, date, category, amount, source, notes, user_id FROM income
            WHERE user_id = :user_id
            ORDER BY date ASC, id ASC",
        )?
        .query_map(named_params! {":user_id": user_id.as_i64()}, map_row)?
        .map(|maybe_income| maybe_income.map_err(Error::from))
        .collect()
}

/// Retrieve a user's incomes dated from `start` to `end` inclusive, ordered by date.
///
/// The caller should check that `start` is not after `end`.
pub fn get_incomes_in_date_range(
    user_id: UserID,
    start: Date,
    end: Date,
    connection: &Connection,
) -> Result<Vec<Income>, Error> {
    connection
        .prepare(
            "SELECT id, date, category, amount, source, notes, user_id FROM income
            WHERE user_id = :user_id AND date BETWEEN :start AND :end
            ORDER BY date ASC, id ASC",
        )?
        .query_map(
            named_params! {":user_id": user_id.as_i64(), ":start": start, ":end": end},
            map_row,
        )?
        .map(|maybe_income| maybe_income.map_err(Error::from))
        .collect()
}

/// Retrieve a user's incomes with an amount from `min` to `max` inclusive, ordered by date.
pub fn get_incomes_in_value_range(
    user_id: UserID,
    min: Decimal,
    max: Decimal,
    connection: &Connection,
) -> Result<Vec<Income>, Error> {
    let incomes = get_incomes(user_id, connection)?
        .into_iter()
        .filter(|income| income.amount >= min && income.amount <= max)
        .collect();

    Ok(incomes)
}

/// Replace every field of an income. Returns an error if the income doesn't exist.
pub fn update_income(
    income_id: IncomeId,
    income: NewIncome,
    user_id: UserID,
    connection: &Connection,
) -> Result<Income, Error> {
    let rows_affected = connection.execute(
        "UPDATE income
        SET date = ?1, category = ?2, amount = ?3, source = ?4, notes = ?5
        WHERE id = ?6 AND user_id = ?7",
        (
            income.date,
            income.category.as_ref(),
            income.amount.to_string(),
            &income.source,
            &income.notes,
            income_id,
            user_id.as_i64(),
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingIncome);
    }

    Ok(Income {
        id: income_id,
        date: income.date,
        category: income.category,
        amount: income.amount,
        source: income.source,
        notes: income.notes,
        user_id,
    })
}

/// Delete an income. Returns an error if the income doesn't exist.
pub fn delete_income(
    income_id: IncomeId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM income WHERE id = ?1 AND user_id = ?2",
        (income_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingIncome);
    }

    Ok(())
}

pub fn create_income_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS income (
            id INTEGER PRIMARY KEY,
            date TEXT NOT NULL,
            category TEXT NOT NULL,
            amount TEXT NOT NULL,
            source TEXT,
            notes TEXT,
            user_id INTEGER NOT NULL,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_income_user_date ON income(user_id, date);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Income, rusqlite::Error> {
    let raw_category: String = row.get(2)?;

    Ok(Income {
        id: row.get(0)?,
        date: row.get(1)?,
        category: CategoryName::new_unchecked(&raw_category),
        amount: get_decimal(row, 3)?,
        source: row.get(4)?,
        notes: row.get(5)?,
        user_id: UserID::new(row.get(6)?),
    })
}
