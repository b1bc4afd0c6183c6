//! Implements the stores on top of a SQLite connection.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    Error,
    budget::{self, Budget, BudgetMonth, BudgetUpdate, NewBudget},
    category::{self, Category, CategoryUpdate, NewCategory},
    database_id::DatabaseId,
    db,
    store::{BudgetStore, CategoryStore, StorageMode, Store, TransactionStore},
    transaction::{self, NewTransaction, Transaction, TransactionUpdate},
};

/// Stores transactions, categories and budgets in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteStore {
    /// Create a new store and the tables it needs.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if the tables cannot be created.
    pub fn new(connection: Connection) -> Result<Self, Error> {
        db::initialize(&connection)?;

        Ok(Self::from_initialized(connection))
    }

    /// Create a store from a connection whose tables already exist.
    pub fn from_initialized(connection: Connection) -> Self {
        Self {
            connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|error| {
            tracing::error!("could not acquire the database lock: {error}");
            Error::DatabaseLockError
        })
    }
}

impl TransactionStore for SQLiteStore {
    fn get_transactions(&self) -> Result<Vec<Transaction>, Error> {
        transaction::get_transactions(&*self.lock()?)
    }

    fn get_transaction(&self, id: DatabaseId) -> Result<Transaction, Error> {
        transaction::get_transaction(id, &*self.lock()?)
    }

    fn create_transaction(&self, new: NewTransaction) -> Result<Transaction, Error> {
        transaction::create_transaction(new, OffsetDateTime::now_utc(), &*self.lock()?)
    }

    fn update_transaction(
        &self,
        id: DatabaseId,
        update: TransactionUpdate,
    ) -> Result<Transaction, Error> {
        transaction::update_transaction(id, update, OffsetDateTime::now_utc(), &*self.lock()?)
    }

    fn delete_transaction(&self, id: DatabaseId) -> Result<(), Error> {
        transaction::delete_transaction(id, &*self.lock()?)
    }
}

impl CategoryStore for SQLiteStore {
    fn get_categories(&self) -> Result<Vec<Category>, Error> {
        category::get_categories(&*self.lock()?)
    }

    fn get_category(&self, id: DatabaseId) -> Result<Category, Error> {
        category::get_category(id, &*self.lock()?)
    }

    fn create_category(&self, new: NewCategory) -> Result<Category, Error> {
        category::create_category(new, &*self.lock()?)
    }

    fn update_category(&self, id: DatabaseId, update: CategoryUpdate) -> Result<Category, Error> {
        category::update_category(id, update, &*self.lock()?)
    }

    fn delete_category(&self, id: DatabaseId) -> Result<(), Error> {
        category::delete_category(id, &*self.lock()?)
    }

    fn initialize_categories(&self, categories: &[NewCategory]) -> Result<bool, Error> {
        category::initialize_categories(categories, &*self.lock()?)
    }
}

impl BudgetStore for SQLiteStore {
    fn get_budgets(&self) -> Result<Vec<Budget>, Error> {
        budget::get_budgets(&*self.lock()?)
    }

    fn get_budgets_for_month(&self, month: BudgetMonth, year: i32) -> Result<Vec<Budget>, Error> {
        budget::get_budgets_for_month(month, year, &*self.lock()?)
    }

    fn get_budget(&self, id: DatabaseId) -> Result<Budget, Error> {
        budget::get_budget(id, &*self.lock()?)
    }

    fn create_budget(&self, new: NewBudget) -> Result<Budget, Error> {
        budget::create_budget(new, OffsetDateTime::now_utc(), &*self.lock()?)
    }

    fn update_budget(&self, id: DatabaseId, update: BudgetUpdate) -> Result<Budget, Error> {
        budget::update_budget(id, update, OffsetDateTime::now_utc(), &*self.lock()?)
    }

    fn delete_budget(&self, id: DatabaseId) -> Result<(), Error> {
        budget::delete_budget(id, &*self.lock()?)
    }
}

impl Store for SQLiteStore {
    fn list_collections(&self) -> Result<Vec<String>, Error> {
        db::list_tables(&*self.lock()?)
    }

    fn mode(&self) -> StorageMode {
        StorageMode::Database
    }
}
