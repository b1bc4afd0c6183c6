//! Routes for checking that the server is configured and can reach its database.
//!
//! None of these routes ever reveal a secret, only whether it is set.

use std::sync::Arc;

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use time::OffsetDateTime;

use crate::{AppState, Config, store::SharedStore, store::StorageMode};

/// The state needed by the diagnostics routes.
#[derive(Clone)]
pub struct DiagnosticsState {
    /// The configuration the server was started with.
    pub config: Arc<Config>,
    /// The store serving requests.
    pub store: SharedStore,
}

impl FromRef<AppState> for DiagnosticsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            config: state.config.clone(),
            store: state.store.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Health {
    status: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    timestamp: OffsetDateTime,
    environment: String,
    has_database_url: bool,
    has_gemini_key: bool,
    db_name: String,
    storage_mode: StorageMode,
}

/// A route handler that reports that the server is up and how it is configured.
pub async fn get_health_endpoint(State(state): State<DiagnosticsState>) -> Response {
    Json(Health {
        status: "healthy",
        timestamp: OffsetDateTime::now_utc(),
        environment: state.config.environment.clone(),
        has_database_url: state.config.database_location().is_some(),
        has_gemini_key: state.config.has_gemini_key(),
        db_name: state.config.db_name.clone(),
        storage_mode: state.store.mode(),
    })
    .into_response()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct EnvironmentInfo {
    app_env: String,
    database_url_exists: bool,
    database_url_length: usize,
    db_name: String,
    gemini_api_key_exists: bool,
    gemini_model: String,
    local_timezone: String,
    memory_fallback: bool,
    storage_mode: StorageMode,
}

/// A route handler that reports which configuration values are set.
///
/// The database URL and API key are reported by presence and length only.
pub async fn get_debug_env_endpoint(State(state): State<DiagnosticsState>) -> Response {
    let config = &state.config;
    let database_url = config.database_url.as_deref().unwrap_or_default();

    let info = EnvironmentInfo {
        app_env: config.environment.clone(),
        database_url_exists: !database_url.trim().is_empty(),
        database_url_length: database_url.len(),
        db_name: config.db_name.clone(),
        gemini_api_key_exists: config.has_gemini_key(),
        gemini_model: config.gemini_model.clone(),
        local_timezone: config.local_timezone.clone(),
        memory_fallback: config.memory_fallback,
        storage_mode: state.store.mode(),
    };

    tracing::info!("Environment debug info: {info:?}");

    Json(info).into_response()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConnectionReport {
    success: bool,
    message: &'static str,
    collections_count: usize,
    collections: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConnectionFailure {
    error: &'static str,
    details: String,
    has_database_url: bool,
    has_db_name: bool,
}

/// A route handler that checks the database can be queried and lists its collections.
pub async fn get_test_connection_endpoint(State(state): State<DiagnosticsState>) -> Response {
    let Some(location) = state.config.database_location() else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({
                "error": "Database URL not found in configuration"
            })),
        )
            .into_response();
    };

    tracing::info!("Testing the database connection to {location}");

    match state.store.list_collections() {
        Ok(collections) => {
            tracing::info!("Collections found: {}", collections.len());

            Json(ConnectionReport {
                success: true,
                message: "Database connection successful",
                collections_count: collections.len(),
                collections,
            })
            .into_response()
        }
        Err(error) => {
            tracing::error!("Connection test failed: {error}");

            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ConnectionFailure {
                    error: "Connection test failed",
                    details: error.to_string(),
                    has_database_url: true,
                    has_db_name: !state.config.db_name.trim().is_empty(),
                }),
            )
                .into_response()
        }
    }
}
