//! Defines the JSON endpoints for managing budgets.

use axum::{
    Json,
    extract::{FromRef, Path, Query, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::WithRejection;
use serde_json::json;

use crate::{
    AppState, Error,
    budget::{Budget, BudgetFilter, BudgetPayload},
    database_id::parse_id,
    endpoints::{self, format_endpoint},
    routing::created_response,
    store::SharedStore,
};

/// The state needed to manage budgets.
#[derive(Clone)]
pub struct BudgetState {
    /// The store holding the budgets.
    pub store: SharedStore,
}

impl FromRef<AppState> for BudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }
}

/// A route handler that lists budgets, optionally only those for one month.
///
/// The budget list is not essential to any page, so a storage failure is
/// logged and answered with an empty list.
pub async fn get_budgets_endpoint(
    State(state): State<BudgetState>,
    Query(filter): Query<BudgetFilter>,
) -> Response {
    let month_and_year = match filter.month_and_year() {
        Ok(month_and_year) => month_and_year,
        Err(error) => return error.into_json_response("Failed to fetch budgets"),
    };

    let result = match month_and_year {
        Some((month, year)) => state.store.get_budgets_for_month(month, year),
        None => state.store.get_budgets(),
    };

    match result {
        Ok(budgets) => Json(budgets).into_response(),
        Err(error) => {
            tracing::error!("Could not fetch budgets, responding with an empty list: {error}");
            Json(Vec::<Budget>::new()).into_response()
        }
    }
}

/// A route handler for creating a new budget, responds with the stored budget.
pub async fn create_budget_endpoint(
    State(state): State<BudgetState>,
    WithRejection(Json(payload), _): WithRejection<Json<BudgetPayload>, Error>,
) -> Response {
    let result = payload
        .into_new_budget()
        .and_then(|new_budget| state.store.create_budget(new_budget));

    match result {
        Ok(budget) => {
            tracing::info!(
                "Created budget {} for {} {}/{}",
                budget.id,
                budget.category,
                budget.month,
                budget.year
            );
            created_response(format_endpoint(endpoints::BUDGET, budget.id), budget)
        }
        Err(error) => error.into_json_response("Failed to create budget"),
    }
}

/// A route handler for getting a single budget.
pub async fn get_budget_endpoint(
    State(state): State<BudgetState>,
    Path(budget_id): Path<String>,
) -> Response {
    let result = parse_id(&budget_id)
        .ok_or(Error::BudgetNotFound)
        .and_then(|id| state.store.get_budget(id));

    match result {
        Ok(budget) => Json(budget).into_response(),
        Err(error) => error.into_json_response("Failed to fetch budget"),
    }
}

/// A route handler for changing some or all of the fields of a budget.
pub async fn update_budget_endpoint(
    State(state): State<BudgetState>,
    Path(budget_id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<BudgetPayload>, Error>,
) -> Response {
    let result = parse_id(&budget_id)
        .ok_or(Error::BudgetNotFound)
        .and_then(|id| Ok((id, payload.into_update()?)))
        .and_then(|(id, update)| state.store.update_budget(id, update));

    match result {
        Ok(budget) => Json(budget).into_response(),
        Err(error) => error.into_json_response("Failed to update budget"),
    }
}

/// A route handler for deleting a budget.
pub async fn delete_budget_endpoint(
    State(state): State<BudgetState>,
    Path(budget_id): Path<String>,
) -> Response {
    let result = parse_id(&budget_id)
        .ok_or(Error::BudgetNotFound)
        .and_then(|id| state.store.delete_budget(id));

    match result {
        Ok(()) => Json(json!({ "message": "Budget deleted successfully" })).into_response(),
        Err(error) => error.into_json_response("Failed to delete budget"),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::test_utils::{broken_store_server, test_server};

    #[tokio::test]
    async fn create_pads_month_and_lists_budget() {
        let server = test_server();

        let response = server
            .post("/api/budgets")
            .json(&json!({
                "category": "Food & Dining",
                "amount": "500",
                "month": "7",
                "year": "2025"
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let created: Value = response.json();
        assert_eq!(created["month"], json!("07"));
        assert_eq!(created["year"], json!(2025));
        assert_eq!(created["amount"], json!(500.0));

        let listed: Vec<Value> = server.get("/api/budgets").await.json();
        assert_eq!(listed, vec![created]);
    }

    #[tokio::test]
    async fn create_with_missing_field_is_bad_request() {
        let server = test_server();

        let response = server
            .post("/api/budgets")
            .json(&json!({ "category": "Travel", "amount": 100, "month": "01" }))
            .await;

        response.assert_status_bad_request();
        response.assert_json(&json!({ "error": "Missing required fields" }));
    }

    #[tokio::test]
    async fn list_can_be_filtered_by_month() {
        let server = test_server();
        for month in ["06", "07"] {
            server
                .post("/api/budgets")
                .json(&json!({
                    "category": "Shopping",
                    "amount": 300,
                    "month": month,
                    "year": 2025
                }))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let listed: Vec<Value> = server.get("/api/budgets?month=7&year=2025").await.json();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0]["month"], json!("07"));
    }

    #[tokio::test]
    async fn update_get_and_delete() {
        let server = test_server();
        let created: Value = server
            .post("/api/budgets")
            .json(&json!({
                "category": "Healthcare",
                "amount": 200,
                "month": "03",
                "year": 2025
            }))
            .await
            .json();
        let path = format!("/api/budgets/{}", created["_id"]);

        let updated: Value = server
            .put(&path)
            .json(&json!({ "amount": 250, "month": 4 }))
            .await
            .json();
        assert_eq!(updated["amount"], json!(250.0));
        assert_eq!(updated["month"], json!("04"));
        assert_eq!(updated["category"], json!("Healthcare"));

        server.get(&path).await.assert_json(&updated);
        server.delete(&path).await.assert_status_ok();
        server.get(&path).await.assert_status_not_found();
        server
            .delete(&path)
            .await
            .assert_json(&json!({ "error": "Budget not found" }));
    }

    #[tokio::test]
    async fn storage_failure_lists_no_budgets() {
        let server = broken_store_server();

        let response = server.get("/api/budgets").await;

        response.assert_status_ok();
        response.assert_json(&json!([]));
    }
}
