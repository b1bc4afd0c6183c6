//! Defines the JSON endpoints for listing, creating, reading, updating and
//! deleting transactions.

use axum::{
    Json,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::WithRejection;
use serde_json::json;

use crate::{
    AppState, Error,
    database_id::parse_id,
    endpoints::{self, format_endpoint},
    routing::created_response,
    store::SharedStore,
    transaction::TransactionPayload,
};

/// The state needed to manage transactions.
#[derive(Clone)]
pub struct TransactionState {
    /// The store holding the transactions.
    pub store: SharedStore,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }
}

/// A route handler that lists all transactions, newest first.
pub async fn get_transactions_endpoint(State(state): State<TransactionState>) -> Response {
    match state.store.get_transactions() {
        Ok(transactions) => Json(transactions).into_response(),
        Err(error) => error.into_json_response("Failed to fetch transactions"),
    }
}

/// A route handler for creating a new transaction, responds with the stored transaction.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    WithRejection(Json(payload), _): WithRejection<Json<TransactionPayload>, Error>,
) -> Response {
    let new_transaction = match payload.into_new_transaction() {
        Ok(new_transaction) => new_transaction,
        Err(error) => return error.into_json_response("Failed to create transaction"),
    };

    match state.store.create_transaction(new_transaction) {
        Ok(transaction) => {
            tracing::info!("Created transaction {}", transaction.id);
            created_response(
                format_endpoint(endpoints::TRANSACTION, transaction.id),
                transaction,
            )
        }
        Err(error) => error.into_json_response("Failed to create transaction"),
    }
}

/// A route handler for getting a single transaction.
pub async fn get_transaction_endpoint(
    State(state): State<TransactionState>,
    Path(transaction_id): Path<String>,
) -> Response {
    let Some(id) = parse_id(&transaction_id) else {
        return Error::TransactionNotFound.into_json_response("Failed to fetch transaction");
    };

    match state.store.get_transaction(id) {
        Ok(transaction) => Json(transaction).into_response(),
        Err(error) => error.into_json_response("Failed to fetch transaction"),
    }
}

/// A route handler for changing some or all of the fields of a transaction.
pub async fn update_transaction_endpoint(
    State(state): State<TransactionState>,
    Path(transaction_id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<TransactionPayload>, Error>,
) -> Response {
    let Some(id) = parse_id(&transaction_id) else {
        return Error::TransactionNotFound.into_json_response("Failed to update transaction");
    };

    let result = payload
        .into_update()
        .and_then(|update| state.store.update_transaction(id, update));

    match result {
        Ok(transaction) => Json(transaction).into_response(),
        Err(error) => error.into_json_response("Failed to update transaction"),
    }
}

/// A route handler for deleting a transaction.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionState>,
    Path(transaction_id): Path<String>,
) -> Response {
    let Some(id) = parse_id(&transaction_id) else {
        return Error::TransactionNotFound.into_json_response("Failed to delete transaction");
    };

    match state.store.delete_transaction(id) {
        Ok(()) => {
            tracing::info!("Deleted transaction {id}");
            Json(json!({ "message": "Transaction deleted successfully" })).into_response()
        }
        Err(error) => error.into_json_response("Failed to delete transaction"),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::test_utils::test_server;

    #[tokio::test]
    async fn created_transaction_is_listed_with_submitted_fields() {
        let server = test_server();

        let response = server
            .post("/api/transactions")
            .json(&json!({
                "amount": 25.99,
                "date": "2024-12-15",
                "description": "Lunch at restaurant",
                "category": "Food & Dining",
                "type": "expense"
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let created: Value = response.json();
        let id = created["_id"].as_i64().unwrap();
        assert_eq!(
            response.header("location"),
            format!("/api/transactions/{id}").as_str()
        );

        let listed: Vec<Value> = server.get("/api/transactions").await.json();
        assert_eq!(listed, vec![created.clone()]);
        assert_eq!(created["amount"], json!(25.99));
        assert_eq!(created["date"], json!("2024-12-15"));
        assert_eq!(created["description"], json!("Lunch at restaurant"));
        assert_eq!(created["category"], json!("Food & Dining"));
        assert_eq!(created["type"], json!("expense"));
    }

    #[tokio::test]
    async fn create_with_missing_field_is_bad_request() {
        let server = test_server();

        let response = server
            .post("/api/transactions")
            .json(&json!({ "amount": 10, "date": "2024-12-15", "category": "Other" }))
            .await;

        response.assert_status_bad_request();
        response.assert_json(&json!({ "error": "Missing required fields" }));
    }

    #[tokio::test]
    async fn create_with_invalid_json_is_bad_request() {
        let server = test_server();

        let response = server
            .post("/api/transactions")
            .text("{ not json")
            .content_type("application/json")
            .await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn update_changes_only_given_fields() {
        let server = test_server();
        let created: Value = server
            .post("/api/transactions")
            .json(&json!({
                "amount": "45",
                "date": "2024-12-08",
                "description": "Gas for car",
                "category": "Transportation"
            }))
            .await
            .json();
        let id = created["_id"].as_i64().unwrap();

        let response = server
            .put(&format!("/api/transactions/{id}"))
            .json(&json!({ "amount": 50.5 }))
            .await;

        response.assert_status_ok();
        let updated: Value = response.json();
        assert_eq!(updated["amount"], json!(50.5));
        assert_eq!(updated["description"], json!("Gas for car"));
        assert_eq!(updated["createdAt"], created["createdAt"]);
    }

    #[tokio::test]
    async fn delete_missing_transaction_is_not_found_and_listing_is_unchanged() {
        let server = test_server();
        server
            .post("/api/transactions")
            .json(&json!({
                "amount": 12,
                "date": "2024-12-10",
                "description": "Snacks",
                "category": "Food & Dining"
            }))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server.delete("/api/transactions/9999").await;

        response.assert_status_not_found();
        response.assert_json(&json!({ "error": "Transaction not found" }));
        let listed: Vec<Value> = server.get("/api/transactions").await.json();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let server = test_server();
        let created: Value = server
            .post("/api/transactions")
            .json(&json!({
                "amount": 12,
                "date": "2024-12-10",
                "description": "Snacks",
                "category": "Food & Dining"
            }))
            .await
            .json();
        let path = format!("/api/transactions/{}", created["_id"]);

        server.delete(&path).await.assert_json(&json!({
            "message": "Transaction deleted successfully"
        }));

        server.get(&path).await.assert_status_not_found();
    }

    #[tokio::test]
    async fn unparseable_id_is_not_found() {
        let server = test_server();

        server
            .get("/api/transactions/not-an-id")
            .await
            .assert_status_not_found();
    }
}
