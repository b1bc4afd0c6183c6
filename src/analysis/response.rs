//! Reads the model's reply and provides the analysis used when there is no usable reply.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, analysis::summary::Totals, period::MonthOfYear, transaction::Transaction};

const DEFAULT_SUMMARY: &str = "Analysis completed successfully.";
const DEFAULT_BUDGETING_ADVICE: &str = "Continue monitoring your spending patterns.";

/// An observation about how money is spent and what to do about it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingPattern {
    /// What was observed.
    pub insight: String,
    /// What to do about it.
    pub suggestion: String,
}

/// A narrative review of someone's finances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialAnalysis {
    /// Financial health from 0 to 100.
    pub overall_score: u8,
    /// A short overall assessment.
    pub summary: String,
    /// What is going well.
    pub strengths: Vec<String>,
    /// What needs attention.
    pub concerns: Vec<String>,
    /// Concrete steps to take.
    pub recommendations: Vec<String>,
    /// Advice on setting and keeping budgets.
    pub budgeting_advice: String,
    /// Suggested savings goals.
    pub savings_goals: Vec<String>,
    /// Observations about spending habits.
    pub spending_patterns: Vec<SpendingPattern>,
}

/// The reply as the model may send it, with any field possibly missing.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawAnalysis {
    overall_score: Option<f64>,
    summary: Option<String>,
    strengths: Option<Vec<String>>,
    concerns: Option<Vec<String>>,
    recommendations: Option<Vec<String>>,
    budgeting_advice: Option<String>,
    savings_goals: Option<Vec<String>>,
    spending_patterns: Option<Vec<SpendingPattern>>,
}

/// Remove Markdown code fences, e.g. "```json", and surrounding whitespace.
fn strip_code_fences(text: &str) -> String {
    text.replace("```json\n", "")
        .replace("```json", "")
        .replace("```\n", "")
        .replace("```", "")
        .trim()
        .to_owned()
}

fn non_empty(text: Option<String>, default: &str) -> String {
    text.filter(|text| !text.is_empty())
        .unwrap_or_else(|| default.to_owned())
}

/// Parse the model's reply into an analysis.
///
/// Missing fields get defaults and the score is clamped to 0..=100.
///
/// # Errors
/// Returns [Error::AnalysisParse] if the reply is not a JSON object of the
/// expected shape.
pub fn parse_analysis(reply: &str) -> Result<FinancialAnalysis, Error> {
    let cleaned = strip_code_fences(reply);
    let raw: RawAnalysis =
        serde_json::from_str(&cleaned).map_err(|error| Error::AnalysisParse(error.to_string()))?;

    let overall_score = raw
        .overall_score
        .filter(|score| score.is_finite())
        .unwrap_or_default()
        .clamp(0.0, 100.0)
        .round() as u8;

    Ok(FinancialAnalysis {
        overall_score,
        summary: non_empty(raw.summary, DEFAULT_SUMMARY),
        strengths: raw.strengths.unwrap_or_default(),
        concerns: raw.concerns.unwrap_or_default(),
        recommendations: raw.recommendations.unwrap_or_default(),
        budgeting_advice: non_empty(raw.budgeting_advice, DEFAULT_BUDGETING_ADVICE),
        savings_goals: raw.savings_goals.unwrap_or_default(),
        spending_patterns: raw.spending_patterns.unwrap_or_default(),
    })
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| (*item).to_owned()).collect()
}

/// A generic analysis scored on this month's savings rate alone.
pub fn fallback_analysis(transactions: &[Transaction], today: Date) -> FinancialAnalysis {
    let savings_rate = Totals::for_month(transactions, MonthOfYear::of(today)).savings_rate();

    let overall_score = if savings_rate > 20.0 {
        85
    } else if savings_rate > 10.0 {
        70
    } else {
        55
    };

    FinancialAnalysis {
        overall_score,
        summary: "Your financial data has been analyzed. Consider setting up budgets and tracking \
                  your expenses more closely."
            .to_owned(),
        strengths: strings(&["Regular transaction tracking", "Organized expense categories"]),
        concerns: strings(&["Review spending patterns", "Consider budget optimization"]),
        recommendations: strings(&[
            "Set monthly budgets for all expense categories",
            "Aim for 20% savings rate",
            "Review and categorize all transactions",
            "Track monthly spending trends",
        ]),
        budgeting_advice: "Start with the 50/30/20 rule: 50% needs, 30% wants, 20% savings."
            .to_owned(),
        savings_goals: strings(&[
            "Build emergency fund",
            "Increase monthly savings",
            "Reduce unnecessary expenses",
        ]),
        spending_patterns: vec![SpendingPattern {
            insight: "Monitor your largest expense categories".to_owned(),
            suggestion: "Focus on reducing your top 2-3 spending categories".to_owned(),
        }],
    }
}

#[cfg(test)]
mod tests {
    use time::macros::{date, datetime};

    use crate::{
        Error,
        transaction::{Transaction, TransactionType},
    };

    use super::{fallback_analysis, parse_analysis};

    #[test]
    fn parses_fenced_reply() {
        let reply = "```json\n{\n  \"overallScore\": 72,\n  \"summary\": \"Solid month.\",\n  \"strengths\": [\"Saving\"],\n  \"concerns\": [],\n  \"recommendations\": [\"Keep going\"],\n  \"budgetingAdvice\": \"Stick to it.\",\n  \"savingsGoals\": [\"Emergency fund\"],\n  \"spendingPatterns\": [{\"insight\": \"Food is high\", \"suggestion\": \"Cook more\"}]\n}\n```\n";

        let analysis = parse_analysis(reply).unwrap();

        assert_eq!(analysis.overall_score, 72);
        assert_eq!(analysis.summary, "Solid month.");
        assert_eq!(analysis.strengths, ["Saving"]);
        assert_eq!(analysis.spending_patterns[0].suggestion, "Cook more");
    }

    #[test]
    fn missing_fields_get_defaults() {
        let analysis = parse_analysis("{}").unwrap();

        assert_eq!(analysis.overall_score, 0);
        assert_eq!(analysis.summary, "Analysis completed successfully.");
        assert_eq!(
            analysis.budgeting_advice,
            "Continue monitoring your spending patterns."
        );
        assert!(analysis.strengths.is_empty());
        assert!(analysis.spending_patterns.is_empty());
    }

    #[test]
    fn scores_are_clamped() {
        assert_eq!(
            parse_analysis(r#"{"overallScore": 140}"#).unwrap().overall_score,
            100
        );
        assert_eq!(
            parse_analysis(r#"{"overallScore": -5}"#).unwrap().overall_score,
            0
        );
    }

    #[test]
    fn prose_reply_is_a_parse_error() {
        let result = parse_analysis("I'm sorry, I can't help with that.");

        assert!(matches!(result, Err(Error::AnalysisParse(_))));
    }

    fn transaction(amount: f64, kind: TransactionType) -> Transaction {
        Transaction::build(amount, date!(2026 - 10 - 05), "test", "Other")
            .kind(kind)
            .into_transaction(1, datetime!(2026-10-05 00:00 UTC))
    }

    #[test]
    fn fallback_score_follows_savings_rate() {
        let today = date!(2026 - 10 - 19);
        let cases = [(500.0, 85), (850.0, 70), (950.0, 55)];

        for (expenses, want) in cases {
            let transactions = [
                transaction(1000.0, TransactionType::Income),
                transaction(expenses, TransactionType::Expense),
            ];

            assert_eq!(
                fallback_analysis(&transactions, today).overall_score,
                want,
                "expenses of {expenses}"
            );
        }
    }

    #[test]
    fn fallback_for_no_transactions_is_complete() {
        let analysis = fallback_analysis(&[], date!(2026 - 10 - 19));

        assert_eq!(analysis.overall_score, 55);
        assert!(!analysis.summary.is_empty());
        assert_eq!(analysis.recommendations.len(), 4);
        assert_eq!(analysis.spending_patterns.len(), 1);
    }
}
