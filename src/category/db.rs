//! SQLite storage for categories.

use rusqlite::{Connection, OptionalExtension, Row};

use crate::{
    Error,
    category::{Category, CategoryUpdate, NewCategory},
    database_id::DatabaseId,
};

/// Create the category table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                color TEXT NOT NULL,
                budget REAL
                )",
        (),
    )?;

    Ok(())
}

/// Create a new category in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn create_category(category: NewCategory, connection: &Connection) -> Result<Category, Error> {
    let category = connection
        .prepare(
            "INSERT INTO categories (name, color, budget) VALUES (?1, ?2, ?3)
             RETURNING id, name, color, budget",
        )?
        .query_row(
            (category.name, category.color, category.budget),
            map_category_row,
        )?;

    Ok(category)
}

/// Store `categories` if the category table is empty.
///
/// The check and the inserts run in one SQL transaction so concurrent callers
/// cannot seed the table twice.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn initialize_categories(
    categories: &[NewCategory],
    connection: &Connection,
) -> Result<bool, Error> {
    let transaction = connection.unchecked_transaction()?;

    let count: i64 = transaction.query_row("SELECT COUNT(id) FROM categories", [], |row| {
        row.get(0)
    })?;

    if count > 0 {
        return Ok(false);
    }

    {
        let mut statement = transaction
            .prepare("INSERT INTO categories (name, color, budget) VALUES (?1, ?2, ?3)")?;

        for category in categories {
            statement.execute((&category.name, &category.color, category.budget))?;
        }
    }

    transaction.commit()?;

    Ok(true)
}

/// Retrieve all categories in the order they were created.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn get_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, name, color, budget FROM categories ORDER BY id")?
        .query_map([], map_category_row)?
        .map(|maybe_category| maybe_category.map_err(Error::from))
        .collect()
}

/// Retrieve a category from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::CategoryNotFound] if `id` does not refer to a valid category,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_category(id: DatabaseId, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, name, color, budget FROM categories WHERE id = :id")?
        .query_row(&[(":id", &id)], map_category_row)
        .optional()?
        .ok_or(Error::CategoryNotFound)
}

/// Apply `update` to the category `id` and return the stored result.
///
/// # Errors
/// This function will return a:
/// - [Error::CategoryNotFound] if `id` does not refer to a valid category,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_category(
    id: DatabaseId,
    update: CategoryUpdate,
    connection: &Connection,
) -> Result<Category, Error> {
    let mut category = get_category(id, connection)?;
    update.apply(&mut category);

    connection.execute(
        "UPDATE categories SET name = ?1, color = ?2, budget = ?3 WHERE id = ?4",
        (&category.name, &category.color, category.budget, id),
    )?;

    Ok(category)
}

/// Delete the category `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::CategoryNotFound] if `id` does not refer to a valid category,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_category(id: DatabaseId, connection: &Connection) -> Result<(), Error> {
    let rows_affected =
        connection.execute("DELETE FROM categories WHERE id = :id", &[(":id", &id)])?;

    match rows_affected {
        0 => Err(Error::CategoryNotFound),
        _ => Ok(()),
    }
}

fn map_category_row(row: &Row) -> Result<Category, rusqlite::Error> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        color: row.get(2)?,
        budget: row.get(3)?,
    })
}
