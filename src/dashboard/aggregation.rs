//! Transaction and budget aggregation for the dashboard cards and charts.
//!
//! Provides functions to total this month's income and expenses, aggregate
//! expenses by month and by category, and compare budgets with spending.

use std::collections::BTreeMap;

use serde::Serialize;
use time::Date;

use crate::{
    analysis::{Totals, category_expenses},
    budget::Budget,
    category::category_color,
    period::MonthOfYear,
    transaction::Transaction,
};

/// How many of the latest transactions are shown on the summary cards.
const RECENT_TRANSACTION_COUNT: usize = 5;

/// How many months the monthly expenses chart covers.
const MONTHLY_EXPENSE_MONTHS: usize = 6;

/// The category with the most spending this month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopCategory {
    /// The category name.
    pub name: String,
    /// The amount spent in the category.
    pub amount: f64,
}

/// The figures on the summary cards at the top of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryCards {
    /// This month's income.
    pub total_income: f64,
    /// This month's expenses.
    pub total_expenses: f64,
    /// This month's income minus its expenses.
    pub net_income: f64,
    /// The latest transactions by date, newest first.
    pub recent_transactions: Vec<Transaction>,
    /// The category with the most spending this month, if anything was spent.
    pub top_category: Option<TopCategory>,
}

/// Total expenses for one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyExpense {
    /// The month, e.g. "Oct 2026".
    pub month: String,
    /// The expenses for the month.
    pub amount: f64,
}

/// Total expenses for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryExpense {
    /// The category name.
    pub category: String,
    /// The expenses in the category.
    pub amount: f64,
    /// The display color of the category.
    pub color: String,
}

/// One category's budget next to what was spent in it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetVsActualRow {
    /// The category name.
    pub category: String,
    /// The budgeted amount, zero for categories without a budget.
    pub budget: f64,
    /// The amount spent this month.
    pub actual: f64,
    /// How much of the budget is left, never negative.
    pub remaining: f64,
    /// How much was spent beyond the budget, never negative.
    pub over_budget: f64,
    /// The display color of the category.
    pub color: String,
}

/// Budget and spending summed over all categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BudgetVsActualTotals {
    /// The sum of the budgets.
    pub budget: f64,
    /// The sum of the spending.
    pub actual: f64,
    /// The budget minus the spending, negative when over budget.
    pub remaining: f64,
}

/// This month's budgets compared with this month's spending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetVsActual {
    /// One row per category that has a budget or spending.
    pub rows: Vec<BudgetVsActualRow>,
    /// The sums over all rows.
    pub totals: BudgetVsActualTotals,
}

/// Calculate the summary cards for the month containing `today`.
pub fn summary_cards(transactions: &[Transaction], today: Date) -> SummaryCards {
    let current_month = MonthOfYear::of(today);
    let totals = Totals::for_month(transactions, current_month);

    let mut recent_transactions = transactions.to_vec();
    recent_transactions.sort_by(|a, b| b.date.cmp(&a.date));
    recent_transactions.truncate(RECENT_TRANSACTION_COUNT);

    let top_category = category_expenses(transactions, current_month)
        .into_iter()
        .fold(None, |top: Option<TopCategory>, (name, amount)| match top {
            Some(top) if top.amount >= amount => Some(top),
            _ => Some(TopCategory { name, amount }),
        });

    SummaryCards {
        total_income: totals.income,
        total_expenses: totals.expenses,
        net_income: totals.income - totals.expenses,
        recent_transactions,
        top_category,
    }
}

/// Expense totals for the latest months that have expenses, oldest first.
pub fn monthly_expenses(transactions: &[Transaction]) -> Vec<MonthlyExpense> {
    let totals = transactions
        .iter()
        .filter(|transaction| transaction.is_expense())
        .fold(BTreeMap::new(), |mut totals, transaction| {
            *totals
                .entry(MonthOfYear::of(transaction.date))
                .or_insert(0.0) += transaction.amount;
            totals
        });

    let skip = totals.len().saturating_sub(MONTHLY_EXPENSE_MONTHS);

    totals
        .into_iter()
        .skip(skip)
        .map(|(month, amount)| MonthlyExpense {
            month: month.short_label(),
            amount,
        })
        .collect()
}

/// All-time expense totals per category, largest first.
pub fn category_expenses_with_colors(transactions: &[Transaction]) -> Vec<CategoryExpense> {
    let totals = transactions
        .iter()
        .filter(|transaction| transaction.is_expense())
        .fold(BTreeMap::new(), |mut totals, transaction| {
            *totals
                .entry(transaction.category.as_str())
                .or_insert(0.0) += transaction.amount;
            totals
        });

    let mut expenses: Vec<CategoryExpense> = totals
        .into_iter()
        .map(|(category, amount)| CategoryExpense {
            category: category.to_owned(),
            amount,
            color: category_color(category).to_owned(),
        })
        .collect();

    expenses.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    expenses
}

/// Compare the budgets set for the month containing `today` with the spending in that month.
///
/// A category with more than one budget for the month uses the first one.
pub fn budget_vs_actual(
    transactions: &[Transaction],
    budgets: &[Budget],
    today: Date,
) -> BudgetVsActual {
    let current_month = MonthOfYear::of(today);
    let actual_by_category = category_expenses(transactions, current_month);

    let current_budgets: Vec<&Budget> = budgets
        .iter()
        .filter(|budget| budget.applies_to(current_month.budget_month(), current_month.year()))
        .collect();

    let mut categories: Vec<&str> = Vec::new();
    let budgeted = current_budgets.iter().map(|budget| budget.category.as_str());
    for category in budgeted.chain(actual_by_category.keys().map(String::as_str)) {
        if !categories.contains(&category) {
            categories.push(category);
        }
    }

    let rows: Vec<BudgetVsActualRow> = categories
        .into_iter()
        .map(|category| {
            let budget = current_budgets
                .iter()
                .find(|budget| budget.category == category)
                .map_or(0.0, |budget| budget.amount);
            let actual = actual_by_category.get(category).copied().unwrap_or_default();

            BudgetVsActualRow {
                category: category.to_owned(),
                budget,
                actual,
                remaining: (budget - actual).max(0.0),
                over_budget: (actual - budget).max(0.0),
                color: category_color(category).to_owned(),
            }
        })
        .filter(|row| row.budget > 0.0 || row.actual > 0.0)
        .collect();

    let budget: f64 = rows.iter().map(|row| row.budget).sum();
    let actual: f64 = rows.iter().map(|row| row.actual).sum();

    BudgetVsActual {
        rows,
        totals: BudgetVsActualTotals {
            budget,
            actual,
            remaining: budget - actual,
        },
    }
}

#[cfg(test)]
mod tests {
    use time::macros::{date, datetime};

    use crate::{
        budget::{Budget, BudgetMonth},
        transaction::{Transaction, TransactionType},
    };

    use super::{
        BudgetVsActualRow, TopCategory, budget_vs_actual, category_expenses_with_colors,
        monthly_expenses, summary_cards,
    };

    fn expense(id: i64, amount: f64, date: time::Date, category: &str) -> Transaction {
        Transaction::build(amount, date, "test", category)
            .into_transaction(id, datetime!(2026-01-01 00:00 UTC))
    }

    fn income(id: i64, amount: f64, date: time::Date) -> Transaction {
        Transaction::build(amount, date, "Salary", "Salary")
            .kind(TransactionType::Income)
            .into_transaction(id, datetime!(2026-01-01 00:00 UTC))
    }

    fn budget(category: &str, amount: f64, month: u8, year: i32) -> Budget {
        Budget::build(category, amount, BudgetMonth::new(month).unwrap(), year)
            .into_budget(0, datetime!(2026-01-01 00:00 UTC))
    }

    #[test]
    fn summary_cards_total_current_month() {
        let today = date!(2026 - 10 - 19);
        let transactions = [
            income(1, 5000.0, date!(2026 - 10 - 01)),
            expense(2, 120.0, date!(2026 - 10 - 02), "Food & Dining"),
            expense(3, 300.0, date!(2026 - 10 - 03), "Travel"),
            expense(4, 80.0, date!(2026 - 10 - 04), "Food & Dining"),
            expense(5, 1000.0, date!(2026 - 09 - 30), "Shopping"),
        ];

        let cards = summary_cards(&transactions, today);

        assert_eq!(cards.total_income, 5000.0);
        assert_eq!(cards.total_expenses, 500.0);
        assert_eq!(cards.net_income, 4500.0);
        assert_eq!(
            cards.top_category,
            Some(TopCategory {
                name: "Travel".to_owned(),
                amount: 300.0
            })
        );
    }

    #[test]
    fn summary_cards_keep_five_newest_transactions() {
        let transactions: Vec<Transaction> = (1..=7)
            .map(|day| {
                expense(
                    day,
                    10.0,
                    time::Date::from_calendar_date(2026, time::Month::October, day as u8).unwrap(),
                    "Other",
                )
            })
            .collect();

        let cards = summary_cards(&transactions, date!(2026 - 10 - 19));

        let ids: Vec<i64> = cards.recent_transactions.iter().map(|t| t.id).collect();
        assert_eq!(ids, [7, 6, 5, 4, 3]);
    }

    #[test]
    fn summary_cards_without_spending_have_no_top_category() {
        let cards = summary_cards(&[income(1, 10.0, date!(2026 - 10 - 01))], date!(2026 - 10 - 19));

        assert_eq!(cards.top_category, None);
        assert_eq!(cards.net_income, 10.0);
    }

    #[test]
    fn monthly_expenses_cover_latest_six_months_oldest_first() {
        let transactions: Vec<Transaction> = (1..=8)
            .map(|month| {
                expense(
                    month,
                    month as f64 * 100.0,
                    time::Date::from_calendar_date(
                        2026,
                        time::Month::try_from(month as u8).unwrap(),
                        10,
                    )
                    .unwrap(),
                    "Other",
                )
            })
            .chain([income(9, 9999.0, date!(2026 - 09 - 01))])
            .collect();

        let months = monthly_expenses(&transactions);

        let labels: Vec<&str> = months.iter().map(|month| month.month.as_str()).collect();
        assert_eq!(
            labels,
            ["Mar 2026", "Apr 2026", "May 2026", "Jun 2026", "Jul 2026", "Aug 2026"]
        );
        assert_eq!(months[0].amount, 300.0);
    }

    #[test]
    fn monthly_expenses_order_across_years() {
        let transactions = [
            expense(1, 20.0, date!(2026 - 01 - 05), "Other"),
            expense(2, 10.0, date!(2025 - 12 - 05), "Other"),
        ];

        let labels: Vec<String> = monthly_expenses(&transactions)
            .into_iter()
            .map(|month| month.month)
            .collect();

        assert_eq!(labels, ["Dec 2025", "Jan 2026"]);
    }

    #[test]
    fn category_expenses_are_sorted_and_colored() {
        let transactions = [
            expense(1, 50.0, date!(2025 - 01 - 01), "Travel"),
            expense(2, 75.0, date!(2026 - 10 - 01), "Pets"),
            expense(3, 40.0, date!(2026 - 10 - 01), "Travel"),
            income(4, 1000.0, date!(2026 - 10 - 01)),
        ];

        let expenses = category_expenses_with_colors(&transactions);

        assert_eq!(expenses.len(), 2);
        assert_eq!(expenses[0].category, "Travel");
        assert_eq!(expenses[0].amount, 90.0);
        assert_eq!(expenses[0].color, "#F7DC6F");
        assert_eq!(expenses[1].category, "Pets");
        assert_eq!(expenses[1].color, "#AED6F1");
    }

    #[test]
    fn budget_vs_actual_combines_budgets_and_spending() {
        let today = date!(2026 - 10 - 19);
        let transactions = [
            expense(1, 450.0, date!(2026 - 10 - 02), "Shopping"),
            expense(2, 30.0, date!(2026 - 10 - 03), "Pets"),
            expense(3, 999.0, date!(2026 - 09 - 03), "Travel"),
        ];
        let budgets = [
            budget("Shopping", 400.0, 10, 2026),
            budget("Travel", 200.0, 10, 2026),
            budget("Education", 0.0, 10, 2026),
            budget("Healthcare", 500.0, 9, 2026),
        ];

        let comparison = budget_vs_actual(&transactions, &budgets, today);

        assert_eq!(
            comparison.rows,
            [
                BudgetVsActualRow {
                    category: "Shopping".to_owned(),
                    budget: 400.0,
                    actual: 450.0,
                    remaining: 0.0,
                    over_budget: 50.0,
                    color: "#45B7D1".to_owned(),
                },
                BudgetVsActualRow {
                    category: "Travel".to_owned(),
                    budget: 200.0,
                    actual: 0.0,
                    remaining: 200.0,
                    over_budget: 0.0,
                    color: "#F7DC6F".to_owned(),
                },
                BudgetVsActualRow {
                    category: "Pets".to_owned(),
                    budget: 0.0,
                    actual: 30.0,
                    remaining: 0.0,
                    over_budget: 30.0,
                    color: "#AED6F1".to_owned(),
                },
            ]
        );
        assert_eq!(comparison.totals.budget, 600.0);
        assert_eq!(comparison.totals.actual, 480.0);
        assert_eq!(comparison.totals.remaining, 120.0);
    }

    #[test]
    fn budget_vs_actual_is_empty_without_data() {
        let comparison = budget_vs_actual(&[], &[], date!(2026 - 10 - 19));

        assert!(comparison.rows.is_empty());
        assert_eq!(comparison.totals.remaining, 0.0);
    }
}
