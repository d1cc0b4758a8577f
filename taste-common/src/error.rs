//! Common error types for the taste-match engine

use thiserror::Error;

/// Common result type for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the engine
#[derive(Error, Debug)]
pub enum Error {
    /// The persistent store is unreachable or a query failed
    /// (wraps sqlx::Error); never silently swallowed for writes
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Filesystem error during data folder bootstrap
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested user or profile does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rejected request parameters, caught before any store access
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Stored data that should be impossible (bad timestamp, unknown
    /// tag or status identifier)
    #[error("Internal error: {0}")]
    Internal(String),
}
