//! Application router configuration.

use axum::{
    Json, Router,
    http::{StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;

use crate::{
    AppState,
    analysis::analyze_finances_endpoint,
    budget::{
        create_budget_endpoint, delete_budget_endpoint, get_budget_endpoint, get_budgets_endpoint,
        update_budget_endpoint,
    },
    category::{
        create_category_endpoint, delete_category_endpoint, get_categories_endpoint,
        get_category_endpoint, update_category_endpoint,
    },
    dashboard::get_dashboard_endpoint,
    diagnostics::{get_debug_env_endpoint, get_health_endpoint, get_test_connection_endpoint},
    endpoints,
    not_found::get_404_not_found,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_transaction_endpoint,
        get_transactions_endpoint, update_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            endpoints::TRANSACTIONS,
            get(get_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint)
                .put(update_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .route(
            endpoints::BUDGETS,
            get(get_budgets_endpoint).post(create_budget_endpoint),
        )
        .route(
            endpoints::BUDGET,
            get(get_budget_endpoint)
                .put(update_budget_endpoint)
                .delete(delete_budget_endpoint),
        )
        .route(
            endpoints::CATEGORIES,
            get(get_categories_endpoint).post(create_category_endpoint),
        )
        .route(
            endpoints::CATEGORY,
            get(get_category_endpoint)
                .put(update_category_endpoint)
                .delete(delete_category_endpoint),
        )
        .route(endpoints::AI_ANALYSIS, post(analyze_finances_endpoint))
        .route(endpoints::DASHBOARD, get(get_dashboard_endpoint))
        .route(endpoints::HEALTH, get(get_health_endpoint))
        .route(endpoints::DEBUG_ENV, get(get_debug_env_endpoint))
        .route(endpoints::TEST_CONNECTION, get(get_test_connection_endpoint))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// A 201 Created response with `body` as JSON and a `Location` header pointing at `location`.
pub(crate) fn created_response<T: Serialize>(location: String, body: T) -> Response {
    (StatusCode::CREATED, [(LOCATION, location)], Json(body)).into_response()
}
