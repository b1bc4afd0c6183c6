//! Creates the application's database schema.

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{
    Error, budget::create_budget_table, category::create_category_table,
    transaction::create_transaction_table,
};

/// Create the tables for transactions, categories and budgets if they do not exist yet.
///
/// # Errors
/// Returns an [Error::SqlError] if a table cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_transaction_table(&transaction)?;
    create_category_table(&transaction)?;
    create_budget_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// The names of the tables in the database, sorted by name.
///
/// # Errors
/// Returns an [Error::SqlError] if the schema cannot be read.
pub fn list_tables(connection: &Connection) -> Result<Vec<String>, Error> {
    connection
        .prepare(
            "SELECT name FROM sqlite_master
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
             ORDER BY name",
        )?
        .query_map([], |row| row.get(0))?
        .map(|maybe_name| maybe_name.map_err(Error::from))
        .collect()
}
