//! Implements a struct that holds the state of the REST server.

use std::sync::Arc;

use crate::{Config, Error, analysis::FinancialAnalyzer, store::SharedStore, store::open_store};

/// The state of the REST server.
#[derive(Clone)]
pub struct AppState {
    /// Where transactions, categories and budgets are kept.
    pub store: SharedStore,

    /// Produces the AI analyses.
    pub analyzer: Arc<FinancialAnalyzer>,

    /// The local timezone as a canonical timezone name, e.g. "Asia/Kolkata".
    pub local_timezone: String,

    /// The configuration the server was started with, reported by the diagnostics routes.
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new [AppState] from its parts.
    pub fn new(config: Config, store: SharedStore, analyzer: FinancialAnalyzer) -> Self {
        Self {
            store,
            analyzer: Arc::new(analyzer),
            local_timezone: config.local_timezone.clone(),
            config: Arc::new(config),
        }
    }

    /// Create a new [AppState] by opening the store and analyzer described by `config`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or initialized and
    /// the memory fallback is disabled.
    pub fn from_config(config: Config) -> Result<Self, Error> {
        let store = open_store(&config)?;
        let analyzer = FinancialAnalyzer::from_config(&config);

        Ok(Self::new(config, store, analyzer))
    }
}
