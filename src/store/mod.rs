//! Storage backends for transactions, categories and budgets.
//!
//! Handlers only ever see a [SharedStore], so the same routes can be served
//! from SQLite, from memory, or from SQLite with a switch to memory when the
//! database stops working.

use std::{fmt::Display, sync::Arc};

use rusqlite::Connection;
use serde::Serialize;

use crate::{
    Error,
    budget::{Budget, BudgetMonth, BudgetUpdate, NewBudget},
    category::{Category, CategoryUpdate, NewCategory},
    config::{Config, DatabaseLocation},
    database_id::DatabaseId,
    transaction::{NewTransaction, Transaction, TransactionUpdate},
};

mod fallback;
mod memory;
mod sqlite;

pub use fallback::FallbackStore;
pub use memory::MemoryStore;
pub use sqlite::SQLiteStore;

/// The names of the collections every store holds.
pub const COLLECTIONS: [&str; 3] = ["budgets", "categories", "transactions"];

/// Handles the creation and retrieval of transactions.
pub trait TransactionStore {
    /// Get all transactions, newest date first.
    fn get_transactions(&self) -> Result<Vec<Transaction>, Error>;

    /// Get the transaction `id`.
    ///
    /// # Errors
    /// Returns [Error::TransactionNotFound] if no such transaction exists.
    fn get_transaction(&self, id: DatabaseId) -> Result<Transaction, Error>;

    /// Store a new transaction, assigning its ID and timestamps.
    fn create_transaction(&self, transaction: NewTransaction) -> Result<Transaction, Error>;

    /// Apply `update` to the transaction `id`.
    ///
    /// # Errors
    /// Returns [Error::TransactionNotFound] if no such transaction exists.
    fn update_transaction(
        &self,
        id: DatabaseId,
        update: TransactionUpdate,
    ) -> Result<Transaction, Error>;

    /// Remove the transaction `id`.
    ///
    /// # Errors
    /// Returns [Error::TransactionNotFound] if no such transaction exists.
    fn delete_transaction(&self, id: DatabaseId) -> Result<(), Error>;
}

/// Handles the creation and retrieval of categories.
pub trait CategoryStore {
    /// Get all categories in the order they were created.
    fn get_categories(&self) -> Result<Vec<Category>, Error>;

    /// Get the category `id`.
    ///
    /// # Errors
    /// Returns [Error::CategoryNotFound] if no such category exists.
    fn get_category(&self, id: DatabaseId) -> Result<Category, Error>;

    /// Store a new category.
    fn create_category(&self, category: NewCategory) -> Result<Category, Error>;

    /// Apply `update` to the category `id`.
    ///
    /// # Errors
    /// Returns [Error::CategoryNotFound] if no such category exists.
    fn update_category(&self, id: DatabaseId, update: CategoryUpdate) -> Result<Category, Error>;

    /// Remove the category `id`.
    ///
    /// # Errors
    /// Returns [Error::CategoryNotFound] if no such category exists.
    fn delete_category(&self, id: DatabaseId) -> Result<(), Error>;

    /// Store `categories` if, and only if, there are no categories yet.
    ///
    /// Returns whether the categories were stored.
    fn initialize_categories(&self, categories: &[NewCategory]) -> Result<bool, Error>;
}

/// Handles the creation and retrieval of budgets.
pub trait BudgetStore {
    /// Get all budgets in the order they were created.
    fn get_budgets(&self) -> Result<Vec<Budget>, Error>;

    /// Get the budgets set for `month` of `year`.
    fn get_budgets_for_month(&self, month: BudgetMonth, year: i32) -> Result<Vec<Budget>, Error>;

    /// Get the budget `id`.
    ///
    /// # Errors
    /// Returns [Error::BudgetNotFound] if no such budget exists.
    fn get_budget(&self, id: DatabaseId) -> Result<Budget, Error>;

    /// Store a new budget, assigning its ID and timestamps.
    fn create_budget(&self, budget: NewBudget) -> Result<Budget, Error>;

    /// Apply `update` to the budget `id`.
    ///
    /// # Errors
    /// Returns [Error::BudgetNotFound] if no such budget exists.
    fn update_budget(&self, id: DatabaseId, update: BudgetUpdate) -> Result<Budget, Error>;

    /// Remove the budget `id`.
    ///
    /// # Errors
    /// Returns [Error::BudgetNotFound] if no such budget exists.
    fn delete_budget(&self, id: DatabaseId) -> Result<(), Error>;
}

/// Where the data is currently being kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    /// Data is kept in the SQLite database.
    Database,
    /// Data is kept in process memory and is lost on restart.
    Memory,
}

impl Display for StorageMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageMode::Database => f.write_str("database"),
            StorageMode::Memory => f.write_str("memory"),
        }
    }
}

/// Everything the route handlers need from a storage backend.
pub trait Store: TransactionStore + CategoryStore + BudgetStore + Send + Sync {
    /// The names of the collections in the store.
    ///
    /// Doubles as a check that the store can be reached.
    fn list_collections(&self) -> Result<Vec<String>, Error>;

    /// Where the data is currently being kept.
    fn mode(&self) -> StorageMode;
}

/// A store that can be shared between request handlers.
pub type SharedStore = Arc<dyn Store>;

/// Open the store described by `config`.
///
/// Without a database URL the data is kept in memory. When the memory
/// fallback is enabled, a database that cannot be opened is also replaced by
/// memory, and a database that fails later is swapped out at that point.
///
/// # Errors
/// Returns an error if the database cannot be opened or initialized and the
/// memory fallback is disabled.
pub fn open_store(config: &Config) -> Result<SharedStore, Error> {
    let Some(location) = config.database_location() else {
        tracing::warn!("No database URL configured, data will be kept in memory only.");
        return Ok(Arc::new(MemoryStore::new()));
    };

    match open_sqlite_store(&location) {
        Ok(store) if config.memory_fallback => Ok(Arc::new(FallbackStore::new(store))),
        Ok(store) => Ok(Arc::new(store)),
        Err(error) if config.memory_fallback => {
            tracing::warn!(
                "Could not open the database at {location}: {error}. Falling back to in-memory storage."
            );
            Ok(Arc::new(MemoryStore::new()))
        }
        Err(error) => Err(error),
    }
}

fn open_sqlite_store(location: &DatabaseLocation) -> Result<SQLiteStore, Error> {
    let connection = match location {
        DatabaseLocation::InMemory => Connection::open_in_memory()?,
        DatabaseLocation::File(path) => Connection::open(path)?,
    };

    SQLiteStore::new(connection)
}

#[cfg(test)]
mod open_store_tests {
    use crate::{store::StorageMode, test_utils::test_config};

    use super::open_store;

    #[test]
    fn no_database_url_uses_memory() {
        let config = test_config();

        let store = open_store(&config).unwrap();

        assert_eq!(store.mode(), StorageMode::Memory);
    }

    #[test]
    fn in_memory_database_url_uses_sqlite() {
        let mut config = test_config();
        config.database_url = Some(":memory:".to_owned());

        let store = open_store(&config).unwrap();

        assert_eq!(store.mode(), StorageMode::Database);
        assert_eq!(
            store.list_collections().unwrap(),
            ["budgets", "categories", "transactions"]
        );
    }

    #[test]
    fn unopenable_database_falls_back_to_memory_when_enabled() {
        let mut config = test_config();
        config.database_url = Some("/this/directory/does/not/exist/finance.sqlite3".to_owned());
        config.memory_fallback = true;

        let store = open_store(&config).unwrap();

        assert_eq!(store.mode(), StorageMode::Memory);
    }

    #[test]
    fn unopenable_database_is_an_error_without_fallback() {
        let mut config = test_config();
        config.database_url = Some("/this/directory/does/not/exist/finance.sqlite3".to_owned());

        assert!(open_store(&config).is_err());
    }
}
