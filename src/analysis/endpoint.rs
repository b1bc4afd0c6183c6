//! Defines the endpoint for requesting an analysis of all recorded finances.

use std::sync::Arc;

use axum::{
    Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};

use crate::{AppState, analysis::FinancialAnalyzer, store::SharedStore, timezone::local_today};

/// The state needed to analyze finances.
#[derive(Clone)]
pub struct AnalysisState {
    /// The store holding the transactions and budgets.
    pub store: SharedStore,
    /// Produces the analysis.
    pub analyzer: Arc<FinancialAnalyzer>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Kolkata".
    pub local_timezone: String,
}

impl FromRef<AppState> for AnalysisState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            analyzer: state.analyzer.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A route handler that analyzes every transaction and budget.
///
/// Only fails if the data cannot be loaded, a failing model is replaced by the
/// fallback analysis.
pub async fn analyze_finances_endpoint(State(state): State<AnalysisState>) -> Response {
    let loaded = state.store.get_transactions().and_then(|transactions| {
        let budgets = state.store.get_budgets()?;
        let today = local_today(&state.local_timezone)?;
        Ok((transactions, budgets, today))
    });

    let (transactions, budgets, today) = match loaded {
        Ok(loaded) => loaded,
        Err(error) => {
            return error.into_json_response("Failed to analyze finances. Please try again.");
        }
    };

    let analysis = state.analyzer.analyze(&transactions, &budgets, today).await;

    Json(analysis).into_response()
}
