//! Connection settings and schema files.

use std::path::Path;

use sqlb_core::{Column, Dialect};

use crate::error::Result;

/// Connection settings for [`Database::connect`](crate::Database::connect).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Connection URL, e.g. `sqlite::memory:` or `postgres://localhost/app`.
    pub url: String,
    /// Dialect override. Detected from the URL scheme when `None`.
    pub dialect: Option<Dialect>,
    /// Maximum pool size.
    pub max_connections: u32,
    /// Record every statement in the SQL log.
    pub sql_log: bool,
    /// Log every statement at info level instead of debug.
    pub debug: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            dialect: None,
            max_connections: 5,
            sql_log: false,
            debug: false,
        }
    }
}

impl DatabaseConfig {
    /// Creates a configuration for a connection URL.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Forces a dialect instead of detecting it from the URL.
    #[must_use]
    pub const fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = Some(dialect);
        self
    }

    /// Sets the maximum pool size.
    #[must_use]
    pub const fn max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Enables the SQL log.
    #[must_use]
    pub const fn sql_log(mut self, enabled: bool) -> Self {
        self.sql_log = enabled;
        self
    }

    /// Enables debug logging of statements.
    #[must_use]
    pub const fn debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    /// Returns the configured dialect, or the one implied by the URL.
    ///
    /// # Errors
    ///
    /// Fails when no dialect is set and the URL scheme is not recognized.
    pub fn resolve_dialect(&self) -> Result<Dialect> {
        if let Some(dialect) = self.dialect {
            return Ok(dialect);
        }
        Ok(Dialect::from_url(&self.url)?)
    }

    /// Returns the pool size to use.
    ///
    /// Every connection to an in-memory SQLite database opens a separate
    /// database, so those pools are capped at one connection.
    #[must_use]
    pub fn effective_max_connections(&self) -> u32 {
        if self.url.contains(":memory:") {
            1
        } else {
            self.max_connections.max(1)
        }
    }
}

/// Loads column definitions from a JSON file holding an array of columns.
///
/// ```json
/// [
///   {"name": "id", "type": "integer", "primary_key": true, "auto_increment": true},
///   {"name": "email", "type": "string", "length": 255, "unique": true}
/// ]
/// ```
///
/// # Errors
///
/// Fails when the file cannot be read or parsed, or a column is invalid.
pub fn load_columns(path: impl AsRef<Path>) -> Result<Vec<Column>> {
    let content = std::fs::read_to_string(path)?;
    let columns: Vec<Column> = serde_json::from_str(&content)?;
    for column in &columns {
        column.validate()?;
    }
    Ok(columns)
}
