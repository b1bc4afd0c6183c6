//! Month-over-month spending insights.

use std::collections::BTreeMap;

use serde::Serialize;
use time::Date;

use crate::{
    analysis::category_expenses, budget::Budget, period::MonthOfYear, transaction::Transaction,
};

/// How many categories are listed as the top spending categories.
const TOP_CATEGORY_COUNT: usize = 3;

/// How many category trends are reported.
const CATEGORY_TREND_COUNT: usize = 5;

/// The percentage of a budget that may be spent before it gets a warning.
const WARNING_PERCENTAGE: f64 = 80.0;

/// How many percent spending has to change by to count as a trend.
const TREND_THRESHOLD: f64 = 10.0;

/// How close spending in a category is to its budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetHealth {
    /// Less than 80% of the budget has been spent.
    Good,
    /// More than 80% of the budget has been spent.
    Warning,
    /// More than the budget has been spent.
    Over,
}

impl BudgetHealth {
    fn from_percentage(percentage: f64) -> Self {
        if percentage > 100.0 {
            Self::Over
        } else if percentage > WARNING_PERCENTAGE {
            Self::Warning
        } else {
            Self::Good
        }
    }
}

/// The direction spending in a category is heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpendingTrend {
    /// Spending grew by more than 10%.
    Up,
    /// Spending shrank by more than 10%.
    Down,
    /// Spending changed by 10% or less.
    Stable,
}

impl SpendingTrend {
    fn from_change(change: f64) -> Self {
        if change > TREND_THRESHOLD {
            Self::Up
        } else if change < -TREND_THRESHOLD {
            Self::Down
        } else {
            Self::Stable
        }
    }
}

/// How one of this month's budgets is holding up.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetStatus {
    /// The budget's category.
    pub category: String,
    /// The budgeted amount.
    pub budget: f64,
    /// The amount spent in the category this month.
    pub spent: f64,
    /// The budget minus the spending, negative when over budget.
    pub remaining: f64,
    /// The share of the budget spent, zero for an empty budget.
    pub percentage: f64,
    /// Whether the budget is fine, nearly used up or exceeded.
    pub status: BudgetHealth,
}

/// One of the categories with the most spending this month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopSpending {
    /// The category name.
    pub category: String,
    /// The amount spent this month.
    pub amount: f64,
}

/// How spending in a category changed since last month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTrend {
    /// The category name.
    pub category: String,
    /// The amount spent this month.
    pub current: f64,
    /// The change since last month as a percentage, zero if nothing was spent last month.
    pub change: f64,
    /// The direction of the change.
    pub trend: SpendingTrend,
}

/// Spending this month compared with last month and with this month's budgets.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingInsights {
    /// This month's expenses.
    pub current_total: f64,
    /// Last month's expenses.
    pub last_total: f64,
    /// The change in expenses since last month as a percentage, zero if nothing was spent
    /// last month.
    pub spending_change: f64,
    /// The status of each of this month's budgets.
    pub budget_analysis: Vec<BudgetStatus>,
    /// The number of budgets that have been exceeded.
    pub over_budget_count: usize,
    /// The number of budgets that are nearly used up.
    pub warning_count: usize,
    /// The categories with the most spending this month, largest first.
    pub top_categories: Vec<TopSpending>,
    /// The categories whose spending changed the most since last month.
    pub category_trends: Vec<CategoryTrend>,
}

/// The change from `previous` to `current` as a percentage, zero when `previous` is not positive.
fn percentage_change(current: f64, previous: f64) -> f64 {
    if previous > 0.0 {
        (current - previous) / previous * 100.0
    } else {
        0.0
    }
}

fn budget_statuses(
    budgets: &[Budget],
    month: MonthOfYear,
    spending: &BTreeMap<String, f64>,
) -> Vec<BudgetStatus> {
    budgets
        .iter()
        .filter(|budget| budget.applies_to(month.budget_month(), month.year()))
        .map(|budget| {
            let spent = spending.get(&budget.category).copied().unwrap_or_default();
            let percentage = if budget.amount > 0.0 {
                spent / budget.amount * 100.0
            } else {
                0.0
            };

            BudgetStatus {
                category: budget.category.clone(),
                budget: budget.amount,
                spent,
                remaining: budget.amount - spent,
                percentage,
                status: BudgetHealth::from_percentage(percentage),
            }
        })
        .collect()
}

/// Compare spending in the month containing `today` with the month before and with its budgets.
pub fn spending_insights(
    transactions: &[Transaction],
    budgets: &[Budget],
    today: Date,
) -> SpendingInsights {
    let current_month = MonthOfYear::of(today);
    let current_spending = category_expenses(transactions, current_month);
    let last_spending = category_expenses(transactions, current_month.previous());

    let current_total: f64 = current_spending.values().sum();
    let last_total: f64 = last_spending.values().sum();

    let budget_analysis = budget_statuses(budgets, current_month, &current_spending);
    let count_status = |health: BudgetHealth| {
        budget_analysis
            .iter()
            .filter(|status| status.status == health)
            .count()
    };
    let over_budget_count = count_status(BudgetHealth::Over);
    let warning_count = count_status(BudgetHealth::Warning);

    let mut top_categories: Vec<TopSpending> = current_spending
        .iter()
        .map(|(category, amount)| TopSpending {
            category: category.clone(),
            amount: *amount,
        })
        .collect();
    top_categories.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    top_categories.truncate(TOP_CATEGORY_COUNT);

    let mut category_trends: Vec<CategoryTrend> = current_spending
        .iter()
        .map(|(category, current)| {
            let last = last_spending.get(category).copied().unwrap_or_default();
            let change = percentage_change(*current, last);

            CategoryTrend {
                category: category.clone(),
                current: *current,
                change,
                trend: SpendingTrend::from_change(change),
            }
        })
        .collect();
    category_trends.sort_by(|a, b| b.change.abs().total_cmp(&a.change.abs()));
    category_trends.truncate(CATEGORY_TREND_COUNT);

    SpendingInsights {
        current_total,
        last_total,
        spending_change: percentage_change(current_total, last_total),
        budget_analysis,
        over_budget_count,
        warning_count,
        top_categories,
        category_trends,
    }
}

#[cfg(test)]
mod tests {
    use time::macros::{date, datetime};

    use crate::{
        budget::{Budget, BudgetMonth},
        transaction::Transaction,
    };

    use super::{BudgetHealth, SpendingTrend, spending_insights};

    fn expense(amount: f64, date: time::Date, category: &str) -> Transaction {
        Transaction::build(amount, date, "test", category)
            .into_transaction(0, datetime!(2026-01-01 00:00 UTC))
    }

    fn budget(category: &str, amount: f64) -> Budget {
        Budget::build(category, amount, BudgetMonth::new(10).unwrap(), 2026)
            .into_budget(0, datetime!(2026-01-01 00:00 UTC))
    }

    #[test]
    fn compares_with_last_month() {
        let transactions = [
            expense(150.0, date!(2026 - 10 - 02), "Food & Dining"),
            expense(100.0, date!(2026 - 09 - 02), "Food & Dining"),
        ];

        let insights = spending_insights(&transactions, &[], date!(2026 - 10 - 19));

        assert_eq!(insights.current_total, 150.0);
        assert_eq!(insights.last_total, 100.0);
        assert_eq!(insights.spending_change, 50.0);
    }

    #[test]
    fn no_spending_last_month_means_no_change() {
        let transactions = [expense(150.0, date!(2026 - 10 - 02), "Travel")];

        let insights = spending_insights(&transactions, &[], date!(2026 - 10 - 19));

        assert_eq!(insights.spending_change, 0.0);
        assert_eq!(insights.category_trends[0].change, 0.0);
        assert_eq!(insights.category_trends[0].trend, SpendingTrend::Stable);
    }

    #[test]
    fn last_month_wraps_to_december() {
        let transactions = [
            expense(50.0, date!(2027 - 01 - 02), "Travel"),
            expense(200.0, date!(2026 - 12 - 31), "Travel"),
        ];

        let insights = spending_insights(&transactions, &[], date!(2027 - 01 - 15));

        assert_eq!(insights.last_total, 200.0);
        assert_eq!(insights.spending_change, -75.0);
        assert_eq!(insights.category_trends[0].trend, SpendingTrend::Down);
    }

    #[test]
    fn budgets_are_rated_by_share_spent() {
        let transactions = [
            expense(120.0, date!(2026 - 10 - 02), "Shopping"),
            expense(90.0, date!(2026 - 10 - 02), "Travel"),
            expense(10.0, date!(2026 - 10 - 02), "Education"),
        ];
        let budgets = [
            budget("Shopping", 100.0),
            budget("Travel", 100.0),
            budget("Education", 100.0),
            budget("Healthcare", 0.0),
        ];

        let insights = spending_insights(&transactions, &budgets, date!(2026 - 10 - 19));

        let statuses: Vec<BudgetHealth> = insights
            .budget_analysis
            .iter()
            .map(|status| status.status)
            .collect();
        assert_eq!(
            statuses,
            [
                BudgetHealth::Over,
                BudgetHealth::Warning,
                BudgetHealth::Good,
                BudgetHealth::Good
            ]
        );
        assert_eq!(insights.budget_analysis[0].remaining, -20.0);
        assert_eq!(insights.budget_analysis[3].percentage, 0.0);
        assert_eq!(insights.over_budget_count, 1);
        assert_eq!(insights.warning_count, 1);
    }

    #[test]
    fn lists_top_three_categories() {
        let transactions = [
            expense(10.0, date!(2026 - 10 - 02), "A"),
            expense(40.0, date!(2026 - 10 - 02), "B"),
            expense(30.0, date!(2026 - 10 - 02), "C"),
            expense(20.0, date!(2026 - 10 - 02), "D"),
        ];

        let insights = spending_insights(&transactions, &[], date!(2026 - 10 - 19));

        let names: Vec<&str> = insights
            .top_categories
            .iter()
            .map(|top| top.category.as_str())
            .collect();
        assert_eq!(names, ["B", "C", "D"]);
    }

    #[test]
    fn trends_sorted_by_size_of_change() {
        let categories = ["A", "B", "C", "D", "E", "F"];
        let current = [105.0, 300.0, 50.0, 150.0, 100.0, 120.0];
        let transactions: Vec<Transaction> = categories
            .iter()
            .zip(current)
            .flat_map(|(category, amount)| {
                [
                    expense(amount, date!(2026 - 10 - 02), category),
                    expense(100.0, date!(2026 - 09 - 02), category),
                ]
            })
            .collect();

        let insights = spending_insights(&transactions, &[], date!(2026 - 10 - 19));

        let trends: Vec<(&str, SpendingTrend)> = insights
            .category_trends
            .iter()
            .map(|trend| (trend.category.as_str(), trend.trend))
            .collect();
        assert_eq!(
            trends,
            [
                ("B", SpendingTrend::Up),
                ("C", SpendingTrend::Down),
                ("D", SpendingTrend::Up),
                ("F", SpendingTrend::Up),
                ("A", SpendingTrend::Stable),
            ]
        );
    }
}
