//! Error types for statement execution.

use sqlb_core::BuildError;

/// Errors that can occur while executing statements or reading schemas.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Error reported by the database driver.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The statement could not be rendered.
    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    /// IO error (reading schema files).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A transaction was started while another one is open.
    #[error("transaction already in progress")]
    TransactionInProgress,

    /// Commit or rollback was requested without an open transaction.
    #[error("no transaction in progress")]
    NoTransaction,

    /// A required table or column name was empty.
    #[error("{0} name cannot be empty")]
    EmptyName(&'static str),

    /// The table does not exist.
    #[error("table not found: {0}")]
    TableNotFound(String),
}

impl DbError {
    /// Returns true when the dialect has no support for the operation.
    #[must_use]
    pub const fn is_unsupported(&self) -> bool {
        matches!(self, Self::Build(e) if e.is_unsupported())
    }
}

/// Result type for database operations.
pub type Result<T> = std::result::Result<T, DbError>;
