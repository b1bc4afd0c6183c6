//! A store that switches to memory once its database fails.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::{
    Error,
    budget::{Budget, BudgetMonth, BudgetUpdate, NewBudget},
    category::{Category, CategoryUpdate, NewCategory},
    database_id::DatabaseId,
    store::{BudgetStore, CategoryStore, MemoryStore, StorageMode, Store, TransactionStore},
    transaction::{NewTransaction, Transaction, TransactionUpdate},
};

/// Serves requests from a primary store until it fails with a storage error,
/// then serves this and every later request from memory.
///
/// The switch is one way: once degraded the store never goes back to the
/// primary, so data written to memory is not lost by switching back.
#[derive(Debug)]
pub struct FallbackStore<P> {
    primary: P,
    memory: MemoryStore,
    degraded: AtomicBool,
}

impl<P: Store> FallbackStore<P> {
    /// Wrap `primary` with an empty in-memory fallback.
    pub fn new(primary: P) -> Self {
        Self {
            primary,
            memory: MemoryStore::new(),
            degraded: AtomicBool::new(false),
        }
    }

    /// Whether requests are being served from memory.
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Acquire)
    }

    fn with_store<T>(
        &self,
        operation: &str,
        f: impl Fn(&dyn Store) -> Result<T, Error>,
    ) -> Result<T, Error> {
        if self.is_degraded() {
            return f(&self.memory);
        }

        match f(&self.primary) {
            Err(error) if error.is_storage_failure() => {
                tracing::warn!(
                    "Database failed to {operation}: {error}. Switching to in-memory storage."
                );
                self.degraded.store(true, Ordering::Release);
                f(&self.memory)
            }
            result => result,
        }
    }
}

impl<P: Store> TransactionStore for FallbackStore<P> {
    fn get_transactions(&self) -> Result<Vec<Transaction>, Error> {
        self.with_store("get transactions", |store| store.get_transactions())
    }

    fn get_transaction(&self, id: DatabaseId) -> Result<Transaction, Error> {
        self.with_store("get transaction", |store| store.get_transaction(id))
    }

    fn create_transaction(&self, new: NewTransaction) -> Result<Transaction, Error> {
        self.with_store("create transaction", |store| {
            store.create_transaction(new.clone())
        })
    }

    fn update_transaction(
        &self,
        id: DatabaseId,
        update: TransactionUpdate,
    ) -> Result<Transaction, Error> {
        self.with_store("update transaction", |store| {
            store.update_transaction(id, update.clone())
        })
    }

    fn delete_transaction(&self, id: DatabaseId) -> Result<(), Error> {
        self.with_store("delete transaction", |store| store.delete_transaction(id))
    }
}

impl<P: Store> CategoryStore for FallbackStore<P> {
    fn get_categories(&self) -> Result<Vec<Category>, Error> {
        self.with_store("get categories", |store| store.get_categories())
    }

    fn get_category(&self, id: DatabaseId) -> Result<Category, Error> {
        self.with_store("get category", |store| store.get_category(id))
    }

    fn create_category(&self, new: NewCategory) -> Result<Category, Error> {
        self.with_store("create category", |store| store.create_category(new.clone()))
    }

    fn update_category(&self, id: DatabaseId, update: CategoryUpdate) -> Result<Category, Error> {
        self.with_store("update category", |store| {
            store.update_category(id, update.clone())
        })
    }

    fn delete_category(&self, id: DatabaseId) -> Result<(), Error> {
        self.with_store("delete category", |store| store.delete_category(id))
    }

    fn initialize_categories(&self, categories: &[NewCategory]) -> Result<bool, Error> {
        self.with_store("initialize categories", |store| {
            store.initialize_categories(categories)
        })
    }
}

impl<P: Store> BudgetStore for FallbackStore<P> {
    fn get_budgets(&self) -> Result<Vec<Budget>, Error> {
        self.with_store("get budgets", |store| store.get_budgets())
    }

    fn get_budgets_for_month(&self, month: BudgetMonth, year: i32) -> Result<Vec<Budget>, Error> {
        self.with_store("get budgets", |store| {
            store.get_budgets_for_month(month, year)
        })
    }

    fn get_budget(&self, id: DatabaseId) -> Result<Budget, Error> {
        self.with_store("get budget", |store| store.get_budget(id))
    }

    fn create_budget(&self, new: NewBudget) -> Result<Budget, Error> {
        self.with_store("create budget", |store| store.create_budget(new.clone()))
    }

    fn update_budget(&self, id: DatabaseId, update: BudgetUpdate) -> Result<Budget, Error> {
        self.with_store("update budget", |store| {
            store.update_budget(id, update.clone())
        })
    }

    fn delete_budget(&self, id: DatabaseId) -> Result<(), Error> {
        self.with_store("delete budget", |store| store.delete_budget(id))
    }
}

impl<P: Store> Store for FallbackStore<P> {
    fn list_collections(&self) -> Result<Vec<String>, Error> {
        self.with_store("list collections", |store| store.list_collections())
    }

    fn mode(&self) -> StorageMode {
        if self.is_degraded() {
            StorageMode::Memory
        } else {
            self.primary.mode()
        }
    }
}
