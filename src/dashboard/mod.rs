//! Dashboard module
//!
//! Computes the figures shown on the dashboard: this month's totals, monthly
//! and per category expenses, budgets compared to actual spending and
//! month-over-month spending insights.

mod aggregation;
mod handlers;
mod insights;

pub use handlers::get_dashboard_endpoint;
