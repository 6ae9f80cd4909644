//! Error types for statement building.

use crate::dialect::Dialect;

/// Errors that can occur while configuring a builder or rendering a statement.
///
/// There are two classes of failure:
///
/// - **Precondition violations** (missing table, missing column name, unknown
///   dialect). These are bugs at the call site and should not be retried.
/// - **Unsupported operations** for the selected dialect. These are expected
///   in migration tooling, which can fall back to another strategy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// The dialect name is not one of the supported dialects.
    #[error("unsupported dialect: {0}")]
    UnknownDialect(String),

    /// A column was added without a name.
    #[error("column name is required")]
    MissingColumnName,

    /// A column type was parsed from an empty name.
    #[error("column type is required")]
    MissingColumnType,

    /// A statement that needs a table was rendered without one.
    #[error("in method {operation}() no table specified")]
    MissingTable {
        /// The terminal method that was called.
        operation: &'static str,
    },

    /// A statement that needs a table or a view was rendered without either.
    #[error("in method {operation}() no table or view specified")]
    MissingTableOrView {
        /// The terminal method that was called.
        operation: &'static str,
    },

    /// The dialect has no syntax for the requested DDL operation.
    #[error("{operation} is not supported for driver {dialect}")]
    Unsupported {
        /// Human-readable description of the operation.
        operation: &'static str,
        /// The dialect that rejected it.
        dialect: Dialect,
    },
}

impl BuildError {
    /// Creates an unsupported-operation error.
    #[must_use]
    pub const fn unsupported(operation: &'static str, dialect: Dialect) -> Self {
        Self::Unsupported { operation, dialect }
    }

    /// Returns true for the recoverable "not supported for this dialect" class.
    #[must_use]
    pub const fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }

    /// Returns true for caller bugs that must be fixed at the call site.
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        !self.is_unsupported()
    }
}

/// Result type for builder operations.
pub type Result<T> = std::result::Result<T, BuildError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_message() {
        let err = BuildError::unsupported("adding a column", Dialect::MsSql);
        assert_eq!(
            err.to_string(),
            "adding a column is not supported for driver mssql"
        );
        assert!(err.is_unsupported());
        assert!(!err.is_precondition());
    }

    #[test]
    fn test_precondition_classification() {
        let err = BuildError::MissingTable {
            operation: "Delete",
        };
        assert_eq!(err.to_string(), "in method Delete() no table specified");
        assert!(err.is_precondition());
        assert!(BuildError::MissingColumnName.is_precondition());
        assert!(BuildError::UnknownDialect("oracle".into()).is_precondition());
    }
}
