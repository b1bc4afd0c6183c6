//! Finance tracker is a web service for keeping track of your personal finances.
//!
//! Record income and expenses, set monthly budgets per category, read the
//! figures behind the dashboard and ask a generative model for a narrative
//! review of your finances.
//!
//! This library provides a REST API that speaks JSON.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde::Serialize;
use tokio::signal;

mod analysis;
mod app_state;
mod budget;
mod category;
mod config;
mod dashboard;
mod database_id;
mod db;
mod diagnostics;
mod endpoints;
mod input;
mod logging;
mod not_found;
mod period;
mod routing;
mod store;
mod timezone;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use analysis::{FinancialAnalysis, FinancialAnalyzer, GeminiClient, TextGenerator};
pub use app_state::AppState;
pub use budget::{Budget, BudgetMonth, NewBudget};
pub use category::{Category, NewCategory, predefined_categories};
pub use config::{Config, DatabaseLocation};
pub use database_id::DatabaseId;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use store::{
    BudgetStore, CategoryStore, FallbackStore, MemoryStore, SQLiteStore, SharedStore, StorageMode,
    Store, TransactionStore, open_store,
};
pub use transaction::{NewTransaction, Transaction, TransactionType};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// One or more required fields were absent or empty in a request body.
    #[error("Missing required fields")]
    MissingFields,

    /// A field was present but its value could not be used.
    #[error("Invalid value for '{field}': {reason}")]
    InvalidField {
        /// The name of the offending field as it appears in the request.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// The request body could not be parsed as JSON of the expected shape.
    #[error("Invalid request body: {0}")]
    InvalidRequestBody(String),

    /// No transaction exists with the requested ID.
    #[error("Transaction not found")]
    TransactionNotFound,

    /// No budget exists with the requested ID.
    #[error("Budget not found")]
    BudgetNotFound,

    /// No category exists with the requested ID.
    #[error("Category not found")]
    CategoryNotFound,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("Not found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// An analysis was requested but no Gemini API key is configured.
    #[error("the Gemini API key is not configured")]
    MissingApiKey,

    /// The request to the text generation service failed.
    #[error("the analysis request failed: {0}")]
    AnalysisRequest(String),

    /// The text generation service replied with something that is not an analysis.
    #[error("could not parse the analysis reply: {0}")]
    AnalysisParse(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidRequestBody(rejection.body_text())
    }
}

/// The JSON body sent to clients when a request fails.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl Error {
    /// The HTTP status code that best describes this error.
    fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingFields | Error::InvalidField { .. } | Error::InvalidRequestBody(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::TransactionNotFound
            | Error::BudgetNotFound
            | Error::CategoryNotFound
            | Error::NotFound => StatusCode::NOT_FOUND,
            Error::SqlError(_)
            | Error::DatabaseLockError
            | Error::InvalidTimezoneError(_)
            | Error::MissingApiKey
            | Error::AnalysisRequest(_)
            | Error::AnalysisParse(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the error came from the storage layer rather than from the request.
    pub fn is_storage_failure(&self) -> bool {
        matches!(self, Error::SqlError(_) | Error::DatabaseLockError)
    }

    /// Convert the error into a JSON response.
    ///
    /// Client errors (400, 404) describe themselves. Server errors are logged
    /// and reported with `failure` as the message and the error text as details.
    pub(crate) fn into_json_response(self, failure: &str) -> Response {
        let status = self.status_code();

        let body = if status.is_server_error() {
            tracing::error!("{failure}: {self}");
            ErrorBody {
                error: failure.to_owned(),
                details: Some(self.to_string()),
            }
        } else {
            ErrorBody {
                error: self.to_string(),
                details: None,
            }
        };

        (status, Json(body)).into_response()
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        self.into_json_response("Internal server error")
    }
}
