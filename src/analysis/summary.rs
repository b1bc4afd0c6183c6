//! Condenses transactions and budgets into the figures an analysis is based on.

use std::collections::BTreeMap;

use serde::Serialize;
use time::Date;

use crate::{budget::Budget, period::MonthOfYear, transaction::Transaction};

/// How many months, counting the current one, the trends cover.
const TREND_MONTHS: u32 = 3;

/// Income and expense totals over some period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    /// The sum of all income.
    pub income: f64,
    /// The sum of all expenses.
    pub expenses: f64,
}

impl Totals {
    /// Sum the income and expenses of `transactions`.
    pub fn of<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        transactions
            .into_iter()
            .fold(Self::default(), |mut totals, transaction| {
                if transaction.is_income() {
                    totals.income += transaction.amount;
                } else {
                    totals.expenses += transaction.amount;
                }
                totals
            })
    }

    /// Sum the income and expenses of the transactions that fall in `month`.
    pub fn for_month(transactions: &[Transaction], month: MonthOfYear) -> Self {
        Self::of(
            transactions
                .iter()
                .filter(|transaction| month.contains(transaction.date)),
        )
    }

    /// The share of income that was not spent, as a percentage.
    pub fn savings_rate(&self) -> f64 {
        savings_rate(self.income, self.expenses)
    }
}

/// The share of `income` left after `expenses`, as a percentage.
///
/// Zero when there is no income, so the rate is always defined.
pub fn savings_rate(income: f64, expenses: f64) -> f64 {
    if income > 0.0 {
        (income - expenses) / income * 100.0
    } else {
        0.0
    }
}

/// How spending in one category compares to its budget.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetComparison {
    /// The category name.
    pub category: String,
    /// The budgeted amount.
    pub budgeted: f64,
    /// The amount spent in the category this month.
    pub spent: f64,
    /// Whether more was spent than budgeted.
    pub over_budget: bool,
}

/// Income and expenses for one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTrend {
    /// The month, e.g. "October 2026".
    pub month: String,
    /// The income for the month.
    pub income: f64,
    /// The expenses for the month.
    pub expenses: f64,
}

/// The figures an analysis is based on.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    /// The income of the current month.
    pub current_month_income: f64,
    /// The expenses of the current month.
    pub current_month_expenses: f64,
    /// The current month's savings rate as a percentage.
    pub savings_rate: f64,
    /// The sum of the budgets set for the current month.
    pub total_budget: f64,
    /// The current month's expenses per category.
    pub category_expenses: BTreeMap<String, f64>,
    /// Budgets for the current month compared to what was spent.
    pub budget_vs_actual: Vec<BudgetComparison>,
    /// Income and expenses for the current month and the ones before it, newest first.
    pub monthly_trends: Vec<MonthlyTrend>,
    /// The number of transactions recorded.
    pub transaction_count: usize,
    /// The mean amount over all transactions.
    pub avg_transaction_amount: f64,
}

/// Expense totals per category for the transactions in `month`.
pub fn category_expenses(
    transactions: &[Transaction],
    month: MonthOfYear,
) -> BTreeMap<String, f64> {
    transactions
        .iter()
        .filter(|transaction| transaction.is_expense() && month.contains(transaction.date))
        .fold(BTreeMap::new(), |mut totals, transaction| {
            *totals.entry(transaction.category.clone()).or_default() += transaction.amount;
            totals
        })
}

/// Summarise `transactions` and `budgets` as of `today`.
pub fn prepare_summary(
    transactions: &[Transaction],
    budgets: &[Budget],
    today: Date,
) -> FinancialSummary {
    let current_month = MonthOfYear::of(today);
    let totals = Totals::for_month(transactions, current_month);
    let category_expenses = category_expenses(transactions, current_month);

    let current_budgets: Vec<&Budget> = budgets
        .iter()
        .filter(|budget| budget.applies_to(current_month.budget_month(), current_month.year()))
        .collect();

    let budget_vs_actual = current_budgets
        .iter()
        .map(|budget| {
            let spent = category_expenses
                .get(&budget.category)
                .copied()
                .unwrap_or_default();

            BudgetComparison {
                category: budget.category.clone(),
                budgeted: budget.amount,
                spent,
                over_budget: spent > budget.amount,
            }
        })
        .collect();

    let monthly_trends = (0..TREND_MONTHS)
        .map(|months_back| {
            let month = current_month.months_back(months_back);
            let totals = Totals::for_month(transactions, month);

            MonthlyTrend {
                month: month.long_label(),
                income: totals.income,
                expenses: totals.expenses,
            }
        })
        .collect();

    let transaction_count = transactions.len();
    let avg_transaction_amount = if transaction_count > 0 {
        transactions
            .iter()
            .map(|transaction| transaction.amount)
            .sum::<f64>()
            / transaction_count as f64
    } else {
        0.0
    };

    FinancialSummary {
        current_month_income: totals.income,
        current_month_expenses: totals.expenses,
        savings_rate: totals.savings_rate(),
        total_budget: current_budgets.iter().map(|budget| budget.amount).sum(),
        category_expenses,
        budget_vs_actual,
        monthly_trends,
        transaction_count,
        avg_transaction_amount,
    }
}
