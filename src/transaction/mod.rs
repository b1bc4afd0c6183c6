//! Transaction management for the finance tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the validation of transaction request bodies
//! - Database functions for storing, querying, and managing transactions
//! - The JSON route handlers for transactions

mod core;
mod db;
mod endpoints;

pub use core::{
    NewTransaction, Transaction, TransactionPayload, TransactionType, TransactionUpdate,
};
pub use db::{
    create_transaction, create_transaction_table, delete_transaction, get_transaction,
    get_transactions, update_transaction,
};
pub use endpoints::{
    create_transaction_endpoint, delete_transaction_endpoint, get_transaction_endpoint,
    get_transactions_endpoint, update_transaction_endpoint,
};
