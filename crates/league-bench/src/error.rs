//! Harness error types.

use thiserror::Error;

/// Benchmark harness errors.
///
/// `Config` and `Connection` abort the affected backend's entire run;
/// `Operation` aborts only the scenario in which it occurred.
#[derive(Debug, Error)]
pub enum BenchError {
    /// Endpoint configuration is missing or malformed.
    #[error("configuration error: {0}")]
    Config(String),

    /// Backend could not be reached at setup time.
    #[error("connection error: {0}")]
    Connection(String),

    /// A single timed operation failed.
    #[error("operation error: {0}")]
    Operation(String),
}

impl From<sqlx::Error> for BenchError {
    fn from(e: sqlx::Error) -> Self {
        BenchError::Operation(e.to_string())
    }
}

impl From<mongodb::error::Error> for BenchError {
    fn from(e: mongodb::error::Error) -> Self {
        BenchError::Operation(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BenchError>;
