//! Narrative analysis of someone's finances by a text generation model.
//!
//! The transactions and budgets are condensed into a [FinancialSummary],
//! written into a prompt and sent to a [TextGenerator]. When no model is
//! configured, or the model cannot be reached or answers with something that
//! is not an analysis, a generic analysis based on the savings rate is used.

mod endpoint;
mod gemini;
mod prompt;
mod response;
mod summary;

use std::sync::Arc;

use time::Date;

pub use endpoint::analyze_finances_endpoint;
pub use gemini::{GeminiClient, TextGenerator};
pub use prompt::create_analysis_prompt;
pub use response::{FinancialAnalysis, fallback_analysis, parse_analysis};
pub use summary::{FinancialSummary, Totals, category_expenses, prepare_summary};

use crate::{Config, Error, budget::Budget, transaction::Transaction};

/// Produces analyses, falling back to a generic one when the model fails.
#[derive(Clone, Default)]
pub struct FinancialAnalyzer {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl FinancialAnalyzer {
    /// Create an analyzer that asks `generator` for analyses.
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator: Some(generator),
        }
    }

    /// Create an analyzer that always gives the generic analysis.
    pub fn without_generator() -> Self {
        Self { generator: None }
    }

    /// Create an analyzer backed by Gemini if an API key is configured.
    pub fn from_config(config: &Config) -> Self {
        let key = config.gemini_api_key.as_deref().unwrap_or_default();

        match GeminiClient::new(key, &config.gemini_model) {
            Ok(client) => Self::new(Arc::new(client)),
            Err(error) => {
                tracing::warn!("AI analysis disabled: {error}");
                Self::without_generator()
            }
        }
    }

    /// Analyze `transactions` and `budgets` as of `today`.
    ///
    /// Never fails: any problem with the model is logged and answered with
    /// [fallback_analysis].
    pub async fn analyze(
        &self,
        transactions: &[Transaction],
        budgets: &[Budget],
        today: Date,
    ) -> FinancialAnalysis {
        match self.request_analysis(transactions, budgets, today).await {
            Ok(analysis) => analysis,
            Err(error) => {
                tracing::error!("AI analysis failed, using the fallback analysis: {error}");
                fallback_analysis(transactions, today)
            }
        }
    }

    async fn request_analysis(
        &self,
        transactions: &[Transaction],
        budgets: &[Budget],
        today: Date,
    ) -> Result<FinancialAnalysis, Error> {
        let generator = self.generator.as_ref().ok_or(Error::MissingApiKey)?;

        let summary = prepare_summary(transactions, budgets, today);
        let prompt = create_analysis_prompt(&summary);
        let reply = generator.generate(&prompt).await?;

        parse_analysis(&reply)
    }
}
