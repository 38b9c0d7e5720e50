//! Common error types for the inventory ledger

use thiserror::Error;

/// Common result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy for the ledger core.
///
/// `NotFound` and `InvalidInput` are recoverable and reported to the caller.
/// `Database` is fatal for the operation that hit it; no retry is attempted
/// here, callers may wrap operations in their own retry policy.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding/decoding error (seed documents, persisted batch lists)
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Input rejected at the store boundary
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
