//! Schema introspection and table DDL against a live connection.

use tracing::info;

use sqlb_core::{Builder, Column, Dialect};

use crate::database::Database;
use crate::error::{DbError, Result};

/// Renders `CREATE TABLE` for a table and its columns.
///
/// # Errors
///
/// Fails on an empty table name or an invalid column.
pub fn table_create_sql(dialect: Dialect, table: &str, columns: &[Column]) -> Result<String> {
    Ok(table_builder(dialect, table, columns)?.create()?)
}

/// Renders `CREATE TABLE IF NOT EXISTS` for a table and its columns.
///
/// # Errors
///
/// Fails on an empty table name or an invalid column.
pub fn table_create_if_not_exists_sql(
    dialect: Dialect,
    table: &str,
    columns: &[Column],
) -> Result<String> {
    Ok(table_builder(dialect, table, columns)?.create_if_not_exists()?)
}

/// Renders `DROP TABLE`.
///
/// # Errors
///
/// Fails on an empty table name.
pub fn table_drop_sql(dialect: Dialect, table: &str) -> Result<String> {
    Ok(Builder::new(dialect).table(table).drop()?)
}

/// Renders `DROP TABLE IF EXISTS`.
///
/// # Errors
///
/// Fails on an empty table name.
pub fn table_drop_if_exists_sql(dialect: Dialect, table: &str) -> Result<String> {
    Ok(Builder::new(dialect).table(table).drop_if_exists()?)
}

fn table_builder(dialect: Dialect, table: &str, columns: &[Column]) -> Result<Builder> {
    if table.is_empty() {
        return Err(DbError::EmptyName("table"));
    }
    let builder = columns
        .iter()
        .cloned()
        .try_fold(Builder::new(dialect).table(table), Builder::column)?;
    Ok(builder)
}

impl Database {
    /// Reads the column definitions of an existing table.
    ///
    /// With `commonize` the native types are mapped back to portable
    /// [`ColumnType`](sqlb_core::ColumnType)s; otherwise the native type
    /// name is kept as a custom type. Only MySQL and SQLite can be
    /// described.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::TableNotFound`] for a missing SQLite table, an
    /// unsupported error on other dialects, or the driver error.
    pub async fn table_columns(&self, table: &str, commonize: bool) -> Result<Vec<Column>> {
        if table.is_empty() {
            return Err(DbError::EmptyName("table"));
        }
        let strategy = self.dialect().strategy();
        let describe = strategy.describe_table(table)?;

        // PRAGMA table_info returns no rows for a missing table.
        if self.is_sqlite() && !self.sqlite_table_exists(table).await? {
            return Err(DbError::TableNotFound(table.to_string()));
        }

        let rows = self.select_to_map_string(&describe, &[]).await?;
        rows.iter()
            .map(|row| Ok(strategy.column_from_metadata(row, commonize)?))
            .collect()
    }

    async fn sqlite_table_exists(&self, table: &str) -> Result<bool> {
        let rows = self
            .select_to_map_string(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?",
                &[table.to_string()],
            )
            .await?;
        Ok(!rows.is_empty())
    }

    /// Returns true if `table` has a column named `column`.
    ///
    /// # Errors
    ///
    /// Fails on empty names, on SQL Server, or when the query fails.
    pub async fn table_column_exists(&self, table: &str, column: &str) -> Result<bool> {
        if table.is_empty() {
            return Err(DbError::EmptyName("table"));
        }
        if column.is_empty() {
            return Err(DbError::EmptyName("column"));
        }
        let query = self.builder().table_column_exists(table, column)?;
        let rows = self.select_to_map_string(&query.sql, &query.params).await?;

        // Postgres answers with one boolean row, the others with matching rows.
        let exists = rows
            .first()
            .and_then(|row| row.values().next())
            .is_some_and(|value| matches!(value.as_str(), "1" | "t" | "true"));
        Ok(exists)
    }

    /// Creates a table.
    ///
    /// # Errors
    ///
    /// Fails when the statement cannot be rendered or executed.
    pub async fn table_create(&self, table: &str, columns: &[Column]) -> Result<()> {
        let sql = table_create_sql(self.dialect(), table, columns)?;
        self.exec(&sql).await?;
        info!(table, "Table created");
        Ok(())
    }

    /// Creates a table unless it already exists.
    ///
    /// # Errors
    ///
    /// Fails when the statement cannot be rendered or executed.
    pub async fn table_create_if_not_exists(&self, table: &str, columns: &[Column]) -> Result<()> {
        let sql = table_create_if_not_exists_sql(self.dialect(), table, columns)?;
        self.exec(&sql).await?;
        Ok(())
    }

    /// Drops a table.
    ///
    /// # Errors
    ///
    /// Fails when the statement cannot be rendered or executed.
    pub async fn table_drop(&self, table: &str) -> Result<()> {
        let sql = table_drop_sql(self.dialect(), table)?;
        self.exec(&sql).await?;
        info!(table, "Table dropped");
        Ok(())
    }

    /// Drops a table if it exists.
    ///
    /// # Errors
    ///
    /// Fails when the statement cannot be rendered or executed.
    pub async fn table_drop_if_exists(&self, table: &str) -> Result<()> {
        let sql = table_drop_if_exists_sql(self.dialect(), table)?;
        self.exec(&sql).await?;
        Ok(())
    }
}
