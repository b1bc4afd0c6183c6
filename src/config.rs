//! Command line and environment configuration for the server.

use std::{fmt::Display, path::PathBuf};

use clap::{ArgAction, Parser, builder::BoolishValueParser};

/// The default name of the database.
pub const DEFAULT_DB_NAME: &str = "personal_finance";

/// The default Gemini model used for analyses.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// The REST API server for the finance tracker.
///
/// Every option can also be set with the environment variable named in its help text.
#[derive(Parser, Clone, PartialEq)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Where to keep the SQLite database: a directory, a file path or ":memory:".
    ///
    /// When omitted, data is kept in memory and lost on restart.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// The name of the database, used as the file name when the URL is a directory.
    #[arg(long, env = "DB_NAME", default_value = DEFAULT_DB_NAME)]
    pub db_name: String,

    /// The API key for the Gemini API, required for AI analyses.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    /// The Gemini model used for AI analyses.
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_GEMINI_MODEL)]
    pub gemini_model: String,

    /// The name of the deployment environment, e.g. "production".
    #[arg(long, env = "APP_ENV", default_value = "development")]
    pub environment: String,

    /// The canonical name of the local timezone, e.g. "Asia/Kolkata".
    #[arg(long = "timezone", env = "LOCAL_TIMEZONE", default_value = "Etc/UTC")]
    pub local_timezone: String,

    /// Keep serving from memory when the database fails.
    ///
    /// Accepts the usual spellings of a boolean, e.g. "1", "yes", "on" or "false".
    #[arg(
        long,
        env = "MEMORY_FALLBACK",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value = "false",
        default_missing_value = "true",
        value_parser = BoolishValueParser::new(),
    )]
    pub memory_fallback: bool,

    /// The port to serve the API from.
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// File path for the debug log.
    #[arg(long, env = "LOG_PATH", default_value = "debug.log")]
    pub log_path: PathBuf,
}

// Written by hand so the API key never ends up in a log.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url)
            .field("db_name", &self.db_name)
            .field(
                "gemini_api_key",
                &self.gemini_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("gemini_model", &self.gemini_model)
            .field("environment", &self.environment)
            .field("local_timezone", &self.local_timezone)
            .field("memory_fallback", &self.memory_fallback)
            .field("port", &self.port)
            .field("log_path", &self.log_path)
            .finish()
    }
}

impl Config {
    /// Where the SQLite database lives, or `None` if no database is configured.
    pub fn database_location(&self) -> Option<DatabaseLocation> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .map(|url| resolve_database_location(url, &self.db_name))
    }

    /// Whether a usable Gemini API key is configured.
    pub fn has_gemini_key(&self) -> bool {
        self.gemini_api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }
}

/// Where a SQLite database is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    /// A database that only lives as long as its connection.
    InMemory,
    /// A database file.
    File(PathBuf),
}

impl Display for DatabaseLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatabaseLocation::InMemory => f.write_str(":memory:"),
            DatabaseLocation::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Turn a database URL into a database location.
///
/// The URL may carry a `sqlite://` prefix. A path with a file extension names
/// the database file, any other path names the directory that holds
/// `<db_name>.sqlite3`.
pub fn resolve_database_location(url: &str, db_name: &str) -> DatabaseLocation {
    let path = url.trim();
    let path = path.strip_prefix("sqlite://").unwrap_or(path);

    if path == ":memory:" {
        return DatabaseLocation::InMemory;
    }

    let path = PathBuf::from(path);

    if path.extension().is_some() {
        DatabaseLocation::File(path)
    } else {
        DatabaseLocation::File(path.join(format!("{db_name}.sqlite3")))
    }
}
