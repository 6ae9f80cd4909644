//! SQL dialect support.
//!
//! Each supported database gets one stateless strategy object implementing
//! [`SqlDialect`]. The strategy owns everything that differs between
//! databases: identifier quoting, value escaping, type mapping, and the
//! syntax of the ALTER TABLE family. A [`Dialect`] tag is resolved to its
//! strategy once, when a builder is created.

mod mssql;
mod mysql;
mod postgres;
mod sqlite;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use mssql::MsSqlDialect;
pub use mysql::MySqlDialect;
pub use postgres::PostgresDialect;
pub use sqlite::SqliteDialect;

use crate::error::{BuildError, Result};
use crate::introspect::{MetadataRow, ParameterizedQuery};
use crate::schema::Column;

/// The supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// MySQL and MariaDB.
    MySql,
    /// PostgreSQL.
    Postgres,
    /// SQLite.
    Sqlite,
    /// Microsoft SQL Server.
    MsSql,
}

impl Dialect {
    /// All dialects, in declaration order.
    pub const ALL: [Self; 4] = [Self::MySql, Self::Postgres, Self::Sqlite, Self::MsSql];

    /// Returns the driver name of the dialect.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MySql => "mysql",
            Self::Postgres => "postgres",
            Self::Sqlite => "sqlite",
            Self::MsSql => "mssql",
        }
    }

    /// Returns the strategy object implementing this dialect.
    #[must_use]
    pub const fn strategy(self) -> &'static dyn SqlDialect {
        match self {
            Self::MySql => &MySqlDialect,
            Self::Postgres => &PostgresDialect,
            Self::Sqlite => &SqliteDialect,
            Self::MsSql => &MsSqlDialect,
        }
    }

    /// Detects the dialect from a connection URL scheme.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::UnknownDialect`] for an unrecognized scheme.
    pub fn from_url(url: &str) -> Result<Self> {
        let scheme = url
            .split_once(':')
            .map_or(url, |(scheme, _)| scheme)
            .to_ascii_lowercase();
        match scheme.as_str() {
            "mysql" | "mariadb" => Ok(Self::MySql),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "sqlite" => Ok(Self::Sqlite),
            "mssql" | "sqlserver" => Ok(Self::MsSql),
            _ => Err(BuildError::UnknownDialect(scheme)),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mysql" => Ok(Self::MySql),
            "postgres" | "postgresql" | "pq" => Ok(Self::Postgres),
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            "mssql" | "sqlserver" => Ok(Self::MsSql),
            _ => Err(BuildError::UnknownDialect(s.to_string())),
        }
    }
}

/// Dialect-specific rendering.
///
/// Required methods cover the parts with no sensible common form (the
/// dialect tag and the native type mapping). Everything else has a default
/// that matches the syntax shared by most databases, and dialects override
/// what differs.
pub trait SqlDialect: fmt::Debug + Send + Sync {
    /// Returns the dialect tag.
    fn dialect(&self) -> Dialect;

    /// Returns the dialect name.
    fn name(&self) -> &'static str {
        self.dialect().name()
    }

    /// Opening and closing quote for column identifiers.
    fn column_quote(&self) -> (char, char) {
        ('"', '"')
    }

    /// Opening and closing quote for table, view and index identifiers.
    fn table_quote(&self) -> (char, char) {
        self.column_quote()
    }

    /// Quote character for string literals.
    fn value_quote(&self) -> char {
        '\''
    }

    /// Quotes a possibly qualified column name (`table.column`).
    fn quote_column(&self, name: &str) -> String {
        let (open, close) = self.column_quote();
        quote_segments(name, open, close)
    }

    /// Quotes a possibly qualified table name (`schema.table`).
    fn quote_table(&self, name: &str) -> String {
        let (open, close) = self.table_quote();
        quote_segments(name, open, close)
    }

    /// Renders a string literal, doubling embedded quote characters.
    ///
    /// Backslashes are passed through. On MySQL this is only safe with the
    /// `NO_BACKSLASH_ESCAPES` SQL mode; under the default mode a trailing
    /// `\` escapes the closing quote.
    fn quote_value(&self, value: &str) -> String {
        let quote = self.value_quote();
        let mut escaped = String::with_capacity(value.len() + 2);
        escaped.push(quote);
        for ch in value.chars() {
            if ch == quote {
                escaped.push(quote);
            }
            escaped.push(ch);
        }
        escaped.push(quote);
        escaped
    }

    /// Renders the native type of a column including its length arguments.
    fn column_type_sql(&self, column: &Column) -> String;

    /// The keyword appended to auto-increment columns.
    fn auto_increment_keyword(&self) -> &'static str {
        "AUTOINCREMENT"
    }

    /// Renders a full column definition for CREATE TABLE and ALTER TABLE.
    ///
    /// Modifiers always come in the order auto-increment, primary key,
    /// not null, unique.
    fn column_definition(&self, column: &Column) -> String {
        let (open, close) = self.column_quote();
        let mut sql = format!(
            "{open}{}{close} {}",
            column.name,
            self.column_type_sql(column)
        );

        if column.auto_increment {
            sql.push(' ');
            sql.push_str(self.auto_increment_keyword());
        }
        if column.primary_key {
            sql.push_str(" PRIMARY KEY");
        }
        if !column.nullable {
            sql.push_str(" NOT NULL");
        }
        if column.unique {
            sql.push_str(" UNIQUE");
        }

        sql
    }

    /// Renders CREATE TABLE from already rendered column definitions.
    fn create_table(&self, table: &str, columns_sql: &str, if_not_exists: bool) -> String {
        let if_not_exists = if if_not_exists { "IF NOT EXISTS " } else { "" };
        format!(
            "CREATE TABLE {if_not_exists}{}({columns_sql});",
            self.quote_table(table)
        )
    }

    /// Leading keywords of CREATE VIEW.
    fn create_view_keywords(&self, if_not_exists: bool) -> &'static str {
        if if_not_exists {
            "CREATE VIEW IF NOT EXISTS"
        } else {
            "CREATE VIEW"
        }
    }

    /// Renders a table rename.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Unsupported`] if the dialect cannot rename tables.
    fn rename_table(&self, old_name: &str, new_name: &str) -> Result<String> {
        Ok(format!(
            "ALTER TABLE {} RENAME TO {};",
            self.quote_table(old_name),
            self.quote_table(new_name)
        ))
    }

    /// Renders adding a column to a table.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Unsupported`] if the dialect cannot add columns.
    fn add_column(&self, table: &str, column: &Column) -> Result<String> {
        Ok(format!(
            "ALTER TABLE {} ADD {};",
            self.quote_table(table),
            self.column_definition(column)
        ))
    }

    /// Renders changing the definition of a column.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Unsupported`] if the dialect cannot change columns.
    fn change_column(&self, table: &str, column: &Column) -> Result<String> {
        Ok(format!(
            "ALTER TABLE {} ALTER COLUMN {};",
            self.quote_table(table),
            self.column_definition(column)
        ))
    }

    /// Renders dropping a column.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Unsupported`] if the dialect cannot drop columns.
    fn drop_column(&self, table: &str, column: &str) -> Result<String> {
        Ok(format!(
            "ALTER TABLE {} DROP COLUMN {};",
            self.quote_table(table),
            self.quote_column(column)
        ))
    }

    /// Renders renaming a column.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Unsupported`] if the dialect cannot rename columns.
    fn rename_column(&self, table: &str, old_name: &str, new_name: &str) -> Result<String> {
        Ok(format!(
            "ALTER TABLE {} RENAME COLUMN {} TO {};",
            self.quote_table(table),
            self.quote_column(old_name),
            self.quote_column(new_name)
        ))
    }

    /// Returns the parametrized query checking whether a column exists.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Unsupported`] if the dialect has no metadata query.
    fn column_exists(&self, _table: &str, _column: &str) -> Result<ParameterizedQuery> {
        Err(self.unsupported("checking whether a column exists"))
    }

    /// Returns the metadata query listing the columns of a table.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Unsupported`] if the dialect has no metadata query.
    fn describe_table(&self, _table: &str) -> Result<String> {
        Err(self.unsupported("listing table columns"))
    }

    /// Converts one row returned by [`describe_table`](Self::describe_table)
    /// into a column. With `commonize`, native types are mapped back to
    /// abstract column types.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Unsupported`] if the dialect cannot read
    /// metadata, or an error when a required field is missing.
    fn column_from_metadata(&self, _row: &MetadataRow, _commonize: bool) -> Result<Column> {
        Err(self.unsupported("reading column metadata"))
    }

    /// Builds the unsupported-operation error for this dialect.
    fn unsupported(&self, operation: &'static str) -> BuildError {
        tracing::warn!(dialect = self.name(), operation, "operation not supported");
        BuildError::unsupported(operation, self.dialect())
    }
}

/// Quotes each dot-separated segment, leaving `*` and function calls as-is.
fn quote_segments(name: &str, open: char, close: char) -> String {
    name.split('.')
        .map(|segment| {
            if segment == "*" || segment.contains('(') {
                segment.to_string()
            } else {
                format!("{open}{segment}{close}")
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}

/// Appends `(length)` to a type keyword when a length is set.
fn with_length(keyword: &str, length: Option<u32>) -> String {
    length.map_or_else(|| keyword.to_string(), |n| format!("{keyword}({n})"))
}

/// Renders `DECIMAL(length,decimals)`, defaulting to `DECIMAL(10,2)`.
fn decimal_sql(column: &Column) -> String {
    format!(
        "DECIMAL({},{})",
        column.effective_length().unwrap_or(10),
        column.effective_decimals().unwrap_or(2)
    )
}
