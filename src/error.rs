use std::path::PathBuf;

use thiserror::Error;

/// Startup failures. Every variant ends the process with status 1.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing DB_USER/DB_PASS in environment")]
    MissingCredentials,

    #[error("unsupported connection string `{0}` (expected postgres://, mysql:// or sqlite://)")]
    InvalidDsn(String),

    #[error(
        "`sqlite::memory:` cannot back the menu: every action opens a new connection \
         and would see an empty database (use sqlite://path instead)"
    )]
    MemoryDsn,

    #[error("failed to read env file {}", .path.display())]
    EnvFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The engine could not be reached or rejected the credentials.
#[derive(Debug, Error)]
#[error("Connection failed: {message}")]
pub struct ConnectionError {
    pub message: String,
}

impl ConnectionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: driver_message(message.into()),
        }
    }
}

/// Failure of a single statement. Recoverable: the caller reports it and moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatementError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Error executing query: {0}")]
    Execute(String),
}

impl StatementError {
    pub fn parse(message: impl Into<String>) -> Self {
        StatementError::Parse(driver_message(message.into()))
    }

    pub fn execute(message: impl Into<String>) -> Self {
        StatementError::Execute(driver_message(message.into()))
    }
}

/// Drivers occasionally hand back an empty message; report those as "unknown".
fn driver_message(message: String) -> String {
    if message.trim().is_empty() {
        "unknown".to_string()
    } else {
        message
    }
}
