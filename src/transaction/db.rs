//! SQLite storage for transactions.

use rusqlite::{Connection, OptionalExtension, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    database_id::DatabaseId,
    transaction::{NewTransaction, Transaction, TransactionUpdate},
};

const SELECT_COLUMNS: &str =
    "SELECT id, amount, date, description, category, type, created_at, updated_at FROM transactions";

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                amount REAL NOT NULL,
                date TEXT NOT NULL,
                description TEXT NOT NULL,
                category TEXT NOT NULL,
                type TEXT NOT NULL CHECK (type IN ('expense', 'income')),
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);",
        (),
    )?;

    Ok(())
}

/// Create a new transaction in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn create_transaction(
    transaction: NewTransaction,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "INSERT INTO transactions (amount, date, description, category, type, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
             RETURNING id, amount, date, description, category, type, created_at, updated_at",
        )?
        .query_row(
            (
                transaction.amount,
                transaction.date,
                transaction.description,
                transaction.category,
                transaction.kind.as_str(),
                now,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve all transactions, newest first.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn get_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!("{SELECT_COLUMNS} ORDER BY date DESC, id DESC"))?
        .query_map([], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::TransactionNotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: DatabaseId, connection: &Connection) -> Result<Transaction, Error> {
    connection
        .prepare(&format!("{SELECT_COLUMNS} WHERE id = :id"))?
        .query_row(&[(":id", &id)], map_transaction_row)
        .optional()?
        .ok_or(Error::TransactionNotFound)
}

/// Apply `update` to the transaction `id` and return the stored result.
///
/// # Errors
/// This function will return a:
/// - [Error::TransactionNotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_transaction(
    id: DatabaseId,
    update: TransactionUpdate,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let mut transaction = get_transaction(id, connection)?;
    update.apply(&mut transaction, now);

    connection.execute(
        "UPDATE transactions
         SET amount = ?1, date = ?2, description = ?3, category = ?4, type = ?5, updated_at = ?6
         WHERE id = ?7",
        (
            transaction.amount,
            transaction.date,
            &transaction.description,
            &transaction.category,
            transaction.kind.as_str(),
            transaction.updated_at,
            id,
        ),
    )?;

    Ok(transaction)
}

/// Delete the transaction `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::TransactionNotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_transaction(id: DatabaseId, connection: &Connection) -> Result<(), Error> {
    let rows_affected =
        connection.execute("DELETE FROM transactions WHERE id = :id", &[(":id", &id)])?;

    match rows_affected {
        0 => Err(Error::TransactionNotFound),
        _ => Ok(()),
    }
}

/// Map a database row to a Transaction.
fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let kind: String = row.get(5)?;
    let kind = kind.parse().map_err(|error: Error| {
        rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(error))
    })?;

    Ok(Transaction {
        id: row.get(0)?,
        amount: row.get(1)?,
        date: row.get(2)?,
        description: row.get(3)?,
        category: row.get(4)?,
        kind,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::{date, datetime};

    use crate::{
        Error,
        db::initialize,
        transaction::{Transaction, TransactionType, TransactionUpdate},
    };

    use super::{
        create_transaction, delete_transaction, get_transaction, get_transactions,
        update_transaction,
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();
        let now = datetime!(2024-12-15 10:00 UTC);

        let transaction = create_transaction(
            Transaction::build(3000.0, date!(2024 - 12 - 01), "Monthly salary", "Salary")
                .kind(TransactionType::Income),
            now,
            &conn,
        )
        .unwrap();

        assert!(transaction.id > 0);
        assert_eq!(transaction.kind, TransactionType::Income);
        assert_eq!(transaction.created_at, now);
        assert_eq!(get_transaction(transaction.id, &conn), Ok(transaction));
    }

    #[test]
    fn get_missing_transaction_is_not_found() {
        let conn = get_test_connection();

        assert_eq!(get_transaction(42, &conn), Err(Error::TransactionNotFound));
    }

    #[test]
    fn transactions_are_listed_newest_first() {
        let conn = get_test_connection();
        let now = datetime!(2024-12-15 10:00 UTC);
        for (day, description) in [(10, "middle"), (20, "newest"), (1, "oldest")] {
            let date = date!(2024 - 12 - 01).replace_day(day).unwrap();
            create_transaction(Transaction::build(1.0, date, description, "Other"), now, &conn)
                .unwrap();
        }

        let descriptions: Vec<String> = get_transactions(&conn)
            .unwrap()
            .into_iter()
            .map(|transaction| transaction.description)
            .collect();

        assert_eq!(descriptions, ["newest", "middle", "oldest"]);
    }

    #[test]
    fn update_changes_given_fields_and_timestamp() {
        let conn = get_test_connection();
        let created = datetime!(2024-12-15 10:00 UTC);
        let updated = datetime!(2024-12-16 11:30 UTC);
        let transaction = create_transaction(
            Transaction::build(25.99, date!(2024 - 12 - 15), "Lunch", "Food & Dining"),
            created,
            &conn,
        )
        .unwrap();

        let got = update_transaction(
            transaction.id,
            TransactionUpdate {
                description: Some("Team lunch".to_owned()),
                ..Default::default()
            },
            updated,
            &conn,
        )
        .unwrap();

        assert_eq!(got.description, "Team lunch");
        assert_eq!(got.amount, 25.99);
        assert_eq!(got.created_at, created);
        assert_eq!(got.updated_at, updated);
        assert_eq!(get_transaction(transaction.id, &conn), Ok(got));
    }

    #[test]
    fn update_missing_transaction_is_not_found() {
        let conn = get_test_connection();

        let result = update_transaction(
            7,
            TransactionUpdate::default(),
            datetime!(2024-12-16 11:30 UTC),
            &conn,
        );

        assert_eq!(result, Err(Error::TransactionNotFound));
    }

    #[test]
    fn delete_removes_transaction() {
        let conn = get_test_connection();
        let transaction = create_transaction(
            Transaction::build(1.23, date!(2025 - 10 - 26), "Test", "Other"),
            datetime!(2025-10-26 00:00 UTC),
            &conn,
        )
        .unwrap();

        assert_eq!(delete_transaction(transaction.id, &conn), Ok(()));
        assert_eq!(
            get_transaction(transaction.id, &conn),
            Err(Error::TransactionNotFound)
        );
        assert_eq!(
            delete_transaction(transaction.id, &conn),
            Err(Error::TransactionNotFound)
        );
    }
}
