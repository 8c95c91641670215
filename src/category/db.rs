//! Database operations for categories.
//!
//! Every query is scoped to a user, so a user can never read or change
//! another user's categories.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    auth::UserID,
    category::{Category, CategoryId, CategoryKind, CategoryName},
    db::is_unique_violation,
};

/// Create a category and return it with its generated ID.
///
/// # Errors
///
/// Returns [Error::DuplicateCategory] if the user already has a category with the same name.
pub fn create_category(
    name: CategoryName,
    kind: CategoryKind,
    user_id: UserID,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .execute(
            "INSERT INTO category (name, kind, user_id) VALUES (?1, ?2, ?3);",
            (name.as_ref(), kind, user_id.as_i64()),
        )
        .map_err(|error| map_unique_error(error, &name))?;

    let id = connection.last_insert_rowid();

    Ok(Category {
        id,
        name,
        kind,
        user_id,
    })
}

/// Retrieve a single category by ID.
pub fn get_category(
    category_id: CategoryId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare(
            "SELECT id, name, kind, user_id FROM category WHERE id = :id AND user_id = :user_id;",
        )?
        .query_row(
            &[(":id", &category_id), (":user_id", &user_id.as_i64())],
            map_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve a single category by its name.
///
/// # Errors
///
/// Returns [Error::CategoryNameNotFound] if the user has no category called `name`.
pub fn get_category_by_name(
    name: &CategoryName,
    user_id: UserID,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare(
            "SELECT id, name, kind, user_id FROM category
            WHERE name = :name AND user_id = :user_id;",
        )?
        .query_row(
            rusqlite::named_params! {":name": name.as_ref(), ":user_id": user_id.as_i64()},
            map_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::CategoryNameNotFound(name.to_string()),
            error => error.into(),
        })
}

/// Retrieve a user's categories ordered alphabetically by name, optionally only those of `kind`.
pub fn get_categories(
    user_id: UserID,
    kind: Option<CategoryKind>,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, name, kind, user_id FROM category
            WHERE user_id = :user_id AND (:kind IS NULL OR kind = :kind)
            ORDER BY name ASC;",
        )?
        .query_map(
            rusqlite::named_params! {":user_id": user_id.as_i64(), ":kind": kind},
            map_row,
        )?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Update a category's name and kind. Returns an error if the category doesn't exist.
pub fn update_category(
    category_id: CategoryId,
    name: CategoryName,
    kind: CategoryKind,
    user_id: UserID,
    connection: &Connection,
) -> Result<Category, Error> {
    let rows_affected = connection
        .execute(
            "UPDATE category SET name = ?1, kind = ?2 WHERE id = ?3 AND user_id = ?4",
            (name.as_ref(), kind, category_id, user_id.as_i64()),
        )
        .map_err(|error| map_unique_error(error, &name))?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingCategory);
    }

    Ok(Category {
        id: category_id,
        name,
        kind,
        user_id,
    })
}

/// Delete a category by ID. Returns an error if the category doesn't exist.
///
/// Budgets for the category are deleted with it.
pub fn delete_category(
    category_id: CategoryId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM category WHERE id = ?1 AND user_id = ?2",
        (category_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingCategory);
    }

    Ok(())
}

/// Initialize the category table and indexes.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            kind TEXT NOT NULL,
            user_id INTEGER NOT NULL,
            UNIQUE(user_id, name),
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_category_user ON category(user_id);",
    )?;

    Ok(())
}

fn map_unique_error(error: rusqlite::Error, name: &CategoryName) -> Error {
    if is_unique_violation(&error) {
        Error::DuplicateCategory(name.to_string())
    } else {
        error.into()
    }
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    map_row_with_offset(row, 0)
}

/// Map the four category columns starting at `offset`, for queries that join categories.
pub(crate) fn map_row_with_offset(row: &Row, offset: usize) -> Result<Category, rusqlite::Error> {
    let id = row.get(offset)?;
    let raw_name: String = row.get(offset + 1)?;
    let kind = row.get(offset + 2)?;
    let user_id = UserID::new(row.get(offset + 3)?);

    Ok(Category {
        id,
        name: CategoryName::new_unchecked(&raw_name),
        kind,
        user_id,
    })
}
