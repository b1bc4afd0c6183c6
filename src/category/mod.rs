//! Named, colored groupings for transactions and budgets.
//!
//! This module contains the `Category` model, the predefined categories, the
//! database functions and the JSON route handlers for categories.

mod core;
mod db;
mod endpoints;

pub use core::{
    Category, CategoryPayload, CategoryUpdate, NewCategory, category_color, predefined_categories,
};
pub use db::{
    create_category, create_category_table, delete_category, get_categories, get_category,
    initialize_categories, update_category,
};
pub use endpoints::{
    create_category_endpoint, delete_category_endpoint, get_categories_endpoint,
    get_category_endpoint, update_category_endpoint,
};
