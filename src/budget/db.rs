//! SQLite storage for budgets.

use rusqlite::{Connection, OptionalExtension, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    budget::{Budget, BudgetMonth, BudgetUpdate, NewBudget},
    database_id::DatabaseId,
};

const SELECT_COLUMNS: &str =
    "SELECT id, category, amount, month, year, created_at, updated_at FROM budgets";

/// Create the budget table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS budgets (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                category TEXT NOT NULL,
                amount REAL NOT NULL,
                month TEXT NOT NULL,
                year INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_budgets_year_month ON budgets(year, month);",
        (),
    )?;

    Ok(())
}

/// Create a new budget in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn create_budget(
    budget: NewBudget,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<Budget, Error> {
    let budget = connection
        .prepare(
            "INSERT INTO budgets (category, amount, month, year, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)
             RETURNING id, category, amount, month, year, created_at, updated_at",
        )?
        .query_row(
            (
                budget.category,
                budget.amount,
                budget.month.to_string(),
                budget.year,
                now,
            ),
            map_budget_row,
        )?;

    Ok(budget)
}

/// Retrieve all budgets in the order they were created.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn get_budgets(connection: &Connection) -> Result<Vec<Budget>, Error> {
    connection
        .prepare(&format!("{SELECT_COLUMNS} ORDER BY id"))?
        .query_map([], map_budget_row)?
        .map(|maybe_budget| maybe_budget.map_err(Error::from))
        .collect()
}

/// Retrieve the budgets for `month` of `year`.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn get_budgets_for_month(
    month: BudgetMonth,
    year: i32,
    connection: &Connection,
) -> Result<Vec<Budget>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_COLUMNS} WHERE month = :month AND year = :year ORDER BY id"
        ))?
        .query_map(
            rusqlite::named_params! {":month": month.to_string(), ":year": year},
            map_budget_row,
        )?
        .map(|maybe_budget| maybe_budget.map_err(Error::from))
        .collect()
}

/// Retrieve a budget from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::BudgetNotFound] if `id` does not refer to a valid budget,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_budget(id: DatabaseId, connection: &Connection) -> Result<Budget, Error> {
    connection
        .prepare(&format!("{SELECT_COLUMNS} WHERE id = :id"))?
        .query_row(&[(":id", &id)], map_budget_row)
        .optional()?
        .ok_or(Error::BudgetNotFound)
}

/// Apply `update` to the budget `id` and return the stored result.
///
/// # Errors
/// This function will return a:
/// - [Error::BudgetNotFound] if `id` does not refer to a valid budget,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_budget(
    id: DatabaseId,
    update: BudgetUpdate,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<Budget, Error> {
    let mut budget = get_budget(id, connection)?;
    update.apply(&mut budget, now);

    connection.execute(
        "UPDATE budgets
         SET category = ?1, amount = ?2, month = ?3, year = ?4, updated_at = ?5
         WHERE id = ?6",
        (
            &budget.category,
            budget.amount,
            budget.month.to_string(),
            budget.year,
            budget.updated_at,
            id,
        ),
    )?;

    Ok(budget)
}

/// Delete the budget `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::BudgetNotFound] if `id` does not refer to a valid budget,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_budget(id: DatabaseId, connection: &Connection) -> Result<(), Error> {
    let rows_affected =
        connection.execute("DELETE FROM budgets WHERE id = :id", &[(":id", &id)])?;

    match rows_affected {
        0 => Err(Error::BudgetNotFound),
        _ => Ok(()),
    }
}

fn map_budget_row(row: &Row) -> Result<Budget, rusqlite::Error> {
    let month: String = row.get(3)?;
    let month = month.parse().map_err(|error: Error| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(error))
    })?;

    Ok(Budget {
        id: row.get(0)?,
        category: row.get(1)?,
        amount: row.get(2)?,
        month,
        year: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}
