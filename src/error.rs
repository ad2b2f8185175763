
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("No rows returned")]
    NoRows,
    #[error("Missing field for column: {column}")]
    MissingField { column: String },
    #[error("Invalid state: {0}")]
    InvalidState(String),
    #[error("Store misuse: {0}")]
    Misuse(String),
    #[error("Lock poisoned: {0}")]
    Lock(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

// Helper conversions. A query that matched nothing is a signal of its own,
// distinct from a failing driver.
impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        match e {
            rusqlite::Error::QueryReturnedNoRows => Self::NoRows,
            other => Self::Connection(other.to_string()),
        }
    }
}

impl From<config::ConfigError> for StoreError {
    fn from(e: config::ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}
