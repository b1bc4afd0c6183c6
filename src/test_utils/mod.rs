#![allow(missing_docs)]

use std::{path::PathBuf, sync::Arc};

use axum_test::TestServer;
use rusqlite::Connection;

use crate::{
    AppState, Config, FinancialAnalyzer, MemoryStore, SQLiteStore, build_router,
    config::{DEFAULT_DB_NAME, DEFAULT_GEMINI_MODEL},
};

/// A configuration without a database or API key that ignores the environment.
pub(crate) fn test_config() -> Config {
    Config {
        database_url: None,
        db_name: DEFAULT_DB_NAME.to_owned(),
        gemini_api_key: None,
        gemini_model: DEFAULT_GEMINI_MODEL.to_owned(),
        environment: "test".to_owned(),
        local_timezone: "Etc/UTC".to_owned(),
        memory_fallback: false,
        port: 3000,
        log_path: PathBuf::from("test.log"),
    }
}

pub(crate) fn server_with_state(state: AppState) -> TestServer {
    TestServer::try_new(build_router(state)).expect("Could not create test server.")
}

/// A server backed by an empty in-memory store and no text generation model.
pub(crate) fn test_server() -> TestServer {
    let state = AppState::new(
        test_config(),
        Arc::new(MemoryStore::new()),
        FinancialAnalyzer::without_generator(),
    );

    server_with_state(state)
}

/// A server whose database has no tables, so every query fails.
pub(crate) fn broken_store_server() -> TestServer {
    let connection = Connection::open_in_memory().expect("Could not open database.");
    let state = AppState::new(
        test_config(),
        Arc::new(SQLiteStore::from_initialized(connection)),
        FinancialAnalyzer::without_generator(),
    );

    server_with_state(state)
}
