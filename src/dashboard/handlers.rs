//! Dashboard HTTP handler.
//!
//! Loads every transaction and budget and sends the aggregated figures back
//! as a single JSON document.

use axum::{
    Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::{
    AppState,
    dashboard::{
        aggregation::{
            BudgetVsActual, CategoryExpense, MonthlyExpense, SummaryCards, budget_vs_actual,
            category_expenses_with_colors, monthly_expenses, summary_cards,
        },
        insights::{SpendingInsights, spending_insights},
    },
    store::SharedStore,
    timezone::local_today,
};

/// The state needed for computing the dashboard.
#[derive(Clone)]
pub struct DashboardState {
    /// The store holding the transactions and budgets.
    pub store: SharedStore,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Kolkata".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Everything shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    /// This month's totals, latest transactions and top category.
    pub summary: SummaryCards,
    /// Expenses per month for the latest months with expenses.
    pub monthly_expenses: Vec<MonthlyExpense>,
    /// All-time expenses per category.
    pub category_expenses: Vec<CategoryExpense>,
    /// This month's budgets compared with this month's spending.
    pub budget_vs_actual: BudgetVsActual,
    /// Spending compared with last month and with the budgets.
    pub insights: SpendingInsights,
}

/// A route handler that returns the dashboard figures as JSON.
pub async fn get_dashboard_endpoint(State(state): State<DashboardState>) -> Response {
    let loaded = state.store.get_transactions().and_then(|transactions| {
        let budgets = state.store.get_budgets()?;
        let today = local_today(&state.local_timezone)?;
        Ok((transactions, budgets, today))
    });

    let (transactions, budgets, today) = match loaded {
        Ok(loaded) => loaded,
        Err(error) => return error.into_json_response("Failed to load the dashboard"),
    };

    let dashboard = Dashboard {
        summary: summary_cards(&transactions, today),
        monthly_expenses: monthly_expenses(&transactions),
        category_expenses: category_expenses_with_colors(&transactions),
        budget_vs_actual: budget_vs_actual(&transactions, &budgets, today),
        insights: spending_insights(&transactions, &budgets, today),
    };

    Json(dashboard).into_response()
}
