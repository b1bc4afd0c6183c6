//! Monthly spending limits per category.
//!
//! This module contains the `Budget` model, its database functions and the
//! JSON route handlers for budgets.

mod core;
mod db;
mod endpoints;

pub use core::{Budget, BudgetFilter, BudgetMonth, BudgetPayload, BudgetUpdate, NewBudget};
pub use db::{
    create_budget, create_budget_table, delete_budget, get_budget, get_budgets,
    get_budgets_for_month, update_budget,
};
pub use endpoints::{
    create_budget_endpoint, delete_budget_endpoint, get_budget_endpoint, get_budgets_endpoint,
    update_budget_endpoint,
};
