//! Database operations for budgets.

use rusqlite::{Connection, OptionalExtension, Row, named_params};

use crate::{
    Error,
    auth::UserID,
    budget::{Budget, BudgetId, NewBudget},
    category::{Category, CategoryId, get_category_by_name, map_row_with_offset},
    db::{get_decimal, is_unique_violation},
    period::Period,
};

const SELECT_BUDGET: &str = "SELECT budget.id, budget.limit_amount, budget.period, budget.user_id,
        category.id, category.name, category.kind, category.user_id
    FROM budget
    INNER JOIN category ON category.id = budget.category_id";

/// Store a budget for one of the user's categories.
///
/// # Errors
///
/// This function will return a:
/// - [Error::CategoryNameNotFound] if the user has no category called `budget.category`,
/// - [Error::DuplicateBudget] if the user already has a budget for the category and period,
/// - or [Error::SqlError] if some other SQL error occurred.
pub fn create_budget(
    budget: NewBudget,
    user_id: UserID,
    connection: &Connection,
) -> Result<Budget, Error> {
    let category = get_category_by_name(&budget.category, user_id, connection)?;
    ensure_unique(&category, budget.period, None, user_id, connection)?;

    connection
        .execute(
            "INSERT INTO budget (category_id, limit_amount, period, user_id)
            VALUES (?1, ?2, ?3, ?4)",
            (
                category.id,
                budget.limit.to_string(),
                budget.period,
                user_id.as_i64(),
            ),
        )
        .map_err(|error| duplicate_or_sql_error(error, &category, budget.period))?;

    Ok(Budget {
        id: connection.last_insert_rowid(),
        category,
        limit: budget.limit,
        period: budget.period,
        user_id,
    })
}

/// Retrieve a budget owned by `user_id` along with its category.
pub fn get_budget(
    budget_id: BudgetId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Budget, Error> {
    connection
        .prepare(&format!(
            "{SELECT_BUDGET} WHERE budget.id = :id AND budget.user_id = :user_id"
        ))?
        .query_row(
            named_params! {":id": budget_id, ":user_id": user_id.as_i64()},
            map_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve a user's budgets, optionally only those for `period`.
///
/// Budgets are ordered by period and then by category name.
pub fn get_budgets(
    user_id: UserID,
    period: Option<Period>,
    connection: &Connection,
) -> Result<Vec<Budget>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_BUDGET}
            WHERE budget.user_id = :user_id AND (:period IS NULL OR budget.period = :period)
            ORDER BY budget.period ASC, category.name ASC"
        ))?
        .query_map(
            named_params! {":user_id": user_id.as_i64(), ":period": period},
            map_row,
        )?
        .map(|maybe_budget| maybe_budget.map_err(Error::from))
        .collect()
}

/// Replace the category, limit and period of a budget.
///
/// The same checks as [create_budget] apply, except that the budget does not
/// count as a duplicate of itself.
pub fn update_budget(
    budget_id: BudgetId,
    budget: NewBudget,
    user_id: UserID,
    connection: &Connection,
) -> Result<Budget, Error> {
    let is_owned: bool = connection.query_row(
        "SELECT EXISTS(SELECT 1 FROM budget WHERE id = ?1 AND user_id = ?2)",
        (budget_id, user_id.as_i64()),
        |row| row.get(0),
    )?;
    if !is_owned {
        return Err(Error::UpdateMissingBudget);
    }

    let category = get_category_by_name(&budget.category, user_id, connection)?;
    ensure_unique(&category, budget.period, Some(budget_id), user_id, connection)?;

    let rows_affected = connection
        .execute(
            "UPDATE budget SET category_id = ?1, limit_amount = ?2, period = ?3
            WHERE id = ?4 AND user_id = ?5",
            (
                category.id,
                budget.limit.to_string(),
                budget.period,
                budget_id,
                user_id.as_i64(),
            ),
        )
        .map_err(|error| duplicate_or_sql_error(error, &category, budget.period))?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingBudget);
    }

    Ok(Budget {
        id: budget_id,
        category,
        limit: budget.limit,
        period: budget.period,
        user_id,
    })
}

pub fn delete_budget(
    budget_id: BudgetId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM budget WHERE id = ?1 AND user_id = ?2",
        (budget_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingBudget);
    }

    Ok(())
}

/// Find the budget for a category and period, if there is one.
pub fn find_budget_id(
    category_id: CategoryId,
    period: Period,
    user_id: UserID,
    connection: &Connection,
) -> Result<Option<BudgetId>, Error> {
    connection
        .query_row(
            "SELECT id FROM budget
            WHERE category_id = ?1 AND period = ?2 AND user_id = ?3",
            (category_id, period, user_id.as_i64()),
            |row| row.get(0),
        )
        .optional()
        .map_err(Error::from)
}

/// Create the budget table.
///
/// Deleting a category or a user deletes the budgets that refer to them.
pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS budget (
            id INTEGER PRIMARY KEY,
            category_id INTEGER NOT NULL,
            limit_amount TEXT NOT NULL,
            period TEXT NOT NULL,
            user_id INTEGER NOT NULL,
            UNIQUE(user_id, category_id, period),
            FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE CASCADE,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_budget_user_period ON budget(user_id, period);",
    )?;

    Ok(())
}

fn ensure_unique(
    category: &Category,
    period: Period,
    budget_id: Option<BudgetId>,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    match find_budget_id(category.id, period, user_id, connection)? {
        Some(existing_id) if Some(existing_id) != budget_id => Err(Error::DuplicateBudget {
            category: category.name.to_string(),
            period,
        }),
        _ => Ok(()),
    }
}

fn duplicate_or_sql_error(error: rusqlite::Error, category: &Category, period: Period) -> Error {
    if is_unique_violation(&error) {
        Error::DuplicateBudget {
            category: category.name.to_string(),
            period,
        }
    } else {
        error.into()
    }
}

fn map_row(row: &Row) -> Result<Budget, rusqlite::Error> {
    Ok(Budget {
        id: row.get(0)?,
        limit: get_decimal(row, 1)?,
        period: row.get(2)?,
        user_id: UserID::new(row.get(3)?),
        category: map_row_with_offset(row, 4)?,
    })
}
