//! Builds the request sent to the text generation model.

use serde::Serialize;

use crate::analysis::FinancialSummary;

/// Serialize `value` as compact JSON for embedding in the prompt.
fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|error| {
        tracing::warn!("Could not serialize prompt data: {error}");
        "null".to_owned()
    })
}

/// Write the prompt asking for an analysis of `summary` as a JSON object.
///
/// Amounts are given in rupees.
pub fn create_analysis_prompt(summary: &FinancialSummary) -> String {
    format!(
        r#"
You are a professional financial advisor analyzing someone's personal finances. Based on the following financial data, provide a comprehensive analysis in JSON format.

FINANCIAL DATA:
- Current Month Income: ₹{income}
- Current Month Expenses: ₹{expenses}
- Savings Rate: {savings_rate:.1}%
- Total Budget Set: ₹{total_budget}
- Category Expenses: {category_expenses}
- Budget vs Actual: {budget_vs_actual}
- Monthly Trends: {monthly_trends}

Please analyze this data and respond with a JSON object containing exactly these fields:
{{
  "overallScore": [number 0-100 based on financial health],
  "summary": "[2-3 sentence overall assessment]",
  "strengths": ["[strength 1]", "[strength 2]", "[strength 3]"],
  "concerns": ["[concern 1]", "[concern 2]", "[concern 3]"],
  "recommendations": ["[recommendation 1]", "[recommendation 2]", "[recommendation 3]", "[recommendation 4]"],
  "budgetingAdvice": "[specific budgeting advice paragraph]",
  "savingsGoals": ["[goal 1]", "[goal 2]", "[goal 3]"],
  "spendingPatterns": [
    {{"insight": "[pattern insight]", "suggestion": "[actionable suggestion]"}},
    {{"insight": "[pattern insight]", "suggestion": "[actionable suggestion]"}}
  ]
}}

Focus on:
1. Savings rate analysis (ideal: 20%+)
2. Budget adherence
3. Spending patterns and trends
4. Income vs expenses balance
5. Category-wise spending efficiency
6. Practical, actionable advice
7. Indian financial context and rupee amounts

Be encouraging but honest. Provide specific, actionable recommendations.
"#,
        income = summary.current_month_income,
        expenses = summary.current_month_expenses,
        savings_rate = summary.savings_rate,
        total_budget = summary.total_budget,
        category_expenses = to_json(&summary.category_expenses),
        budget_vs_actual = to_json(&summary.budget_vs_actual),
        monthly_trends = to_json(&summary.monthly_trends),
    )
}
