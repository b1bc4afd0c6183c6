//! Keeps transactions, categories and budgets in process memory.
//!
//! Used when no database is configured and as the stand-in when the database fails.

use std::sync::{Mutex, MutexGuard};

use time::OffsetDateTime;

use crate::{
    Error,
    budget::{Budget, BudgetMonth, BudgetUpdate, NewBudget},
    category::{Category, CategoryUpdate, NewCategory},
    database_id::DatabaseId,
    store::{BudgetStore, COLLECTIONS, CategoryStore, StorageMode, Store, TransactionStore},
    transaction::{NewTransaction, Transaction, TransactionUpdate},
};

#[derive(Debug, Default)]
struct Collections {
    transactions: Vec<Transaction>,
    categories: Vec<Category>,
    budgets: Vec<Budget>,
    last_id: DatabaseId,
}

impl Collections {
    /// IDs are shared across collections and never reused.
    fn next_id(&mut self) -> DatabaseId {
        self.last_id += 1;
        self.last_id
    }
}

/// A store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Mutex<Collections>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Collections>, Error> {
        self.collections.lock().map_err(|error| {
            tracing::error!("could not acquire the memory store lock: {error}");
            Error::DatabaseLockError
        })
    }
}

fn sort_newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
}

impl TransactionStore for MemoryStore {
    fn get_transactions(&self) -> Result<Vec<Transaction>, Error> {
        let mut transactions = self.lock()?.transactions.clone();
        sort_newest_first(&mut transactions);

        Ok(transactions)
    }

    fn get_transaction(&self, id: DatabaseId) -> Result<Transaction, Error> {
        self.lock()?
            .transactions
            .iter()
            .find(|transaction| transaction.id == id)
            .cloned()
            .ok_or(Error::TransactionNotFound)
    }

    fn create_transaction(&self, new: NewTransaction) -> Result<Transaction, Error> {
        let mut collections = self.lock()?;
        let transaction = new.into_transaction(collections.next_id(), OffsetDateTime::now_utc());
        collections.transactions.push(transaction.clone());

        Ok(transaction)
    }

    fn update_transaction(
        &self,
        id: DatabaseId,
        update: TransactionUpdate,
    ) -> Result<Transaction, Error> {
        let mut collections = self.lock()?;
        let transaction = collections
            .transactions
            .iter_mut()
            .find(|transaction| transaction.id == id)
            .ok_or(Error::TransactionNotFound)?;

        update.apply(transaction, OffsetDateTime::now_utc());

        Ok(transaction.clone())
    }

    fn delete_transaction(&self, id: DatabaseId) -> Result<(), Error> {
        let mut collections = self.lock()?;
        let count = collections.transactions.len();
        collections
            .transactions
            .retain(|transaction| transaction.id != id);

        if collections.transactions.len() == count {
            Err(Error::TransactionNotFound)
        } else {
            Ok(())
        }
    }
}

impl CategoryStore for MemoryStore {
    fn get_categories(&self) -> Result<Vec<Category>, Error> {
        Ok(self.lock()?.categories.clone())
    }

    fn get_category(&self, id: DatabaseId) -> Result<Category, Error> {
        self.lock()?
            .categories
            .iter()
            .find(|category| category.id == id)
            .cloned()
            .ok_or(Error::CategoryNotFound)
    }

    fn create_category(&self, new: NewCategory) -> Result<Category, Error> {
        let mut collections = self.lock()?;
        let category = new.into_category(collections.next_id());
        collections.categories.push(category.clone());

        Ok(category)
    }

    fn update_category(&self, id: DatabaseId, update: CategoryUpdate) -> Result<Category, Error> {
        let mut collections = self.lock()?;
        let category = collections
            .categories
            .iter_mut()
            .find(|category| category.id == id)
            .ok_or(Error::CategoryNotFound)?;

        update.apply(category);

        Ok(category.clone())
    }

    fn delete_category(&self, id: DatabaseId) -> Result<(), Error> {
        let mut collections = self.lock()?;
        let count = collections.categories.len();
        collections.categories.retain(|category| category.id != id);

        if collections.categories.len() == count {
            Err(Error::CategoryNotFound)
        } else {
            Ok(())
        }
    }

    fn initialize_categories(&self, categories: &[NewCategory]) -> Result<bool, Error> {
        let mut collections = self.lock()?;

        if !collections.categories.is_empty() {
            return Ok(false);
        }

        for category in categories {
            let id = collections.next_id();
            collections
                .categories
                .push(category.clone().into_category(id));
        }

        Ok(true)
    }
}

impl BudgetStore for MemoryStore {
    fn get_budgets(&self) -> Result<Vec<Budget>, Error> {
        Ok(self.lock()?.budgets.clone())
    }

    fn get_budgets_for_month(&self, month: BudgetMonth, year: i32) -> Result<Vec<Budget>, Error> {
        Ok(self
            .lock()?
            .budgets
            .iter()
            .filter(|budget| budget.applies_to(month, year))
            .cloned()
            .collect())
    }

    fn get_budget(&self, id: DatabaseId) -> Result<Budget, Error> {
        self.lock()?
            .budgets
            .iter()
            .find(|budget| budget.id == id)
            .cloned()
            .ok_or(Error::BudgetNotFound)
    }

    fn create_budget(&self, new: NewBudget) -> Result<Budget, Error> {
        let mut collections = self.lock()?;
        let budget = new.into_budget(collections.next_id(), OffsetDateTime::now_utc());
        collections.budgets.push(budget.clone());

        Ok(budget)
    }

    fn update_budget(&self, id: DatabaseId, update: BudgetUpdate) -> Result<Budget, Error> {
        let mut collections = self.lock()?;
        let budget = collections
            .budgets
            .iter_mut()
            .find(|budget| budget.id == id)
            .ok_or(Error::BudgetNotFound)?;

        update.apply(budget, OffsetDateTime::now_utc());

        Ok(budget.clone())
    }

    fn delete_budget(&self, id: DatabaseId) -> Result<(), Error> {
        let mut collections = self.lock()?;
        let count = collections.budgets.len();
        collections.budgets.retain(|budget| budget.id != id);

        if collections.budgets.len() == count {
            Err(Error::BudgetNotFound)
        } else {
            Ok(())
        }
    }
}

impl Store for MemoryStore {
    fn list_collections(&self) -> Result<Vec<String>, Error> {
        Ok(COLLECTIONS.iter().map(|name| (*name).to_owned()).collect())
    }

    fn mode(&self) -> StorageMode {
        StorageMode::Memory
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        Error,
        budget::{Budget, BudgetMonth},
        category::predefined_categories,
        store::{BudgetStore, CategoryStore, TransactionStore},
        transaction::{Transaction, TransactionUpdate},
    };

    use super::MemoryStore;

    #[test]
    fn lists_transactions_newest_first() {
        let store = MemoryStore::new();
        let older = store
            .create_transaction(Transaction::build(10.0, date!(2024 - 12 - 01), "older", "Other"))
            .unwrap();
        let newer = store
            .create_transaction(Transaction::build(20.0, date!(2024 - 12 - 15), "newer", "Other"))
            .unwrap();

        assert_eq!(store.get_transactions().unwrap(), vec![newer, older]);
    }

    #[test]
    fn update_keeps_creation_time() {
        let store = MemoryStore::new();
        let transaction = store
            .create_transaction(Transaction::build(10.0, date!(2024 - 12 - 01), "Coffee", "Other"))
            .unwrap();

        let updated = store
            .update_transaction(
                transaction.id,
                TransactionUpdate {
                    category: Some("Food & Dining".to_owned()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.category, "Food & Dining");
        assert_eq!(updated.created_at, transaction.created_at);
        assert!(updated.updated_at >= transaction.updated_at);
    }

    #[test]
    fn deleted_ids_are_not_reused() {
        let store = MemoryStore::new();
        let first = store
            .create_transaction(Transaction::build(1.0, date!(2024 - 12 - 01), "a", "Other"))
            .unwrap();
        store.delete_transaction(first.id).unwrap();

        let second = store
            .create_transaction(Transaction::build(1.0, date!(2024 - 12 - 01), "b", "Other"))
            .unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(
            store.delete_transaction(first.id),
            Err(Error::TransactionNotFound)
        );
    }

    #[test]
    fn seeds_categories_once() {
        let store = MemoryStore::new();

        assert_eq!(store.initialize_categories(&predefined_categories()), Ok(true));
        assert_eq!(store.initialize_categories(&predefined_categories()), Ok(false));
        assert_eq!(store.get_categories().unwrap().len(), 10);
    }

    #[test]
    fn filters_budgets_by_month() {
        let store = MemoryStore::new();
        let july = BudgetMonth::new(7).unwrap();
        let want = store
            .create_budget(Budget::build("Travel", 400.0, july, 2025))
            .unwrap();
        store
            .create_budget(Budget::build("Travel", 400.0, BudgetMonth::new(8).unwrap(), 2025))
            .unwrap();

        assert_eq!(store.get_budgets_for_month(july, 2025), Ok(vec![want]));
        assert_eq!(store.get_budget(99), Err(Error::BudgetNotFound));
    }
}
