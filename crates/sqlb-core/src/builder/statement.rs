//! The statement builder.

use std::collections::BTreeMap;

use tracing::debug;

use super::clauses::{compile_group_by, compile_limit_offset, compile_order_by, Direction, OrderBy};
use super::where_clause::{compile_where, Where};
use crate::dialect::{Dialect, SqlDialect};
use crate::error::{BuildError, Result};
use crate::introspect::ParameterizedQuery;
use crate::schema::Column;

/// Accumulates the parts of one SQL statement and renders it for a dialect.
///
/// Configuration methods take the builder by value and return it, so calls
/// chain. Rendering methods borrow the builder and leave its state in place;
/// a builder describes one logical statement and is not meant to be reset.
/// Independent builders share nothing and can be used from different
/// threads freely.
///
/// Rendering fails with a precondition error when the statement needs a
/// table (or view) that was not set, and with an unsupported error when the
/// dialect has no syntax for a DDL operation. See [`BuildError`].
///
/// # Example
///
/// ```
/// use sqlb_core::{Builder, Column, ColumnType, Dialect};
///
/// let sql = Builder::new(Dialect::Sqlite)
///     .table("users")
///     .column(Column::new("id", ColumnType::String).length(40).primary_key())?
///     .column(Column::new("email", ColumnType::String).length(255).unique())?
///     .create()?;
///
/// assert_eq!(
///     sql,
///     r#"CREATE TABLE "users"("id" TEXT(40) PRIMARY KEY NOT NULL, "email" TEXT(255) NOT NULL UNIQUE);"#
/// );
/// # Ok::<(), sqlb_core::BuildError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Builder {
    dialect: &'static dyn SqlDialect,
    table: Option<String>,
    view: Option<String>,
    view_sql: String,
    view_columns: Vec<String>,
    columns: Vec<Column>,
    wheres: Vec<Where>,
    order_by: Vec<OrderBy>,
    group_by: Vec<String>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl Builder {
    /// Creates an empty builder for a dialect.
    #[must_use]
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect: dialect.strategy(),
            table: None,
            view: None,
            view_sql: String::new(),
            view_columns: Vec::new(),
            columns: Vec::new(),
            wheres: Vec::new(),
            order_by: Vec::new(),
            group_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    /// Creates a builder from a driver name such as `"sqlite3"` or `"pq"`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::UnknownDialect`] for an unrecognized driver name.
    pub fn for_driver(name: &str) -> Result<Self> {
        Ok(Self::new(name.parse()?))
    }

    /// Returns the dialect this builder renders for.
    #[must_use]
    pub fn dialect(&self) -> Dialect {
        self.dialect.dialect()
    }

    /// Sets the table the statement operates on.
    #[must_use]
    pub fn table(mut self, name: impl Into<String>) -> Self {
        let name: String = name.into();
        self.table = (!name.is_empty()).then_some(name);
        self
    }

    /// Sets the view for CREATE VIEW and DROP VIEW.
    #[must_use]
    pub fn view(mut self, name: impl Into<String>) -> Self {
        let name: String = name.into();
        self.view = (!name.is_empty()).then_some(name);
        self
    }

    /// Sets the query a view is defined by. It is emitted verbatim.
    #[must_use]
    pub fn view_sql(mut self, sql: impl Into<String>) -> Self {
        self.view_sql = sql.into();
        self
    }

    /// Sets the column names listed after the view name.
    #[must_use]
    pub fn view_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.view_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a column definition for CREATE TABLE.
    ///
    /// # Errors
    ///
    /// Fails when the column has no name or an empty type name.
    pub fn column(mut self, column: Column) -> Result<Self> {
        column.validate()?;
        self.columns.push(column);
        Ok(self)
    }

    /// Adds a WHERE predicate.
    #[must_use]
    pub fn where_clause(mut self, predicate: Where) -> Self {
        self.wheres.push(predicate);
        self
    }

    /// Adds an ORDER BY entry. See [`Direction::parse`] for accepted directions.
    #[must_use]
    pub fn order_by(mut self, column: impl Into<String>, direction: impl Into<Direction>) -> Self {
        self.order_by.push(OrderBy {
            column: column.into(),
            direction: direction.into(),
        });
        self
    }

    /// Adds a GROUP BY column.
    #[must_use]
    pub fn group_by(mut self, column: impl Into<String>) -> Self {
        self.group_by.push(column.into());
        self
    }

    /// Sets the LIMIT. Zero means no limit.
    #[must_use]
    pub const fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the OFFSET. Zero means no offset.
    #[must_use]
    pub const fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Renders CREATE TABLE, or CREATE VIEW when a view is set.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::MissingTableOrView`] when neither is set.
    pub fn create(&self) -> Result<String> {
        self.render_create(false, "Create")
    }

    /// Renders CREATE TABLE IF NOT EXISTS, or the dialect's create-view
    /// variant that tolerates an existing view.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::MissingTableOrView`] when neither is set.
    pub fn create_if_not_exists(&self) -> Result<String> {
        self.render_create(true, "CreateIfNotExists")
    }

    fn render_create(&self, if_not_exists: bool, operation: &'static str) -> Result<String> {
        if let Some(view) = &self.view {
            let columns = if self.view_columns.is_empty() {
                String::new()
            } else {
                format!(" ({})", self.quote_columns(&self.view_columns, ", "))
            };
            let sql = format!(
                "{} {}{columns} AS {}",
                self.dialect.create_view_keywords(if_not_exists),
                self.dialect.quote_table(view),
                self.view_sql
            );
            return Ok(self.rendered(operation, sql));
        }

        let table = self
            .table
            .as_deref()
            .ok_or(BuildError::MissingTableOrView { operation })?;
        let columns: Vec<String> = self
            .columns
            .iter()
            .map(|c| self.dialect.column_definition(c))
            .collect();
        let sql = self
            .dialect
            .create_table(table, &columns.join(", "), if_not_exists);
        Ok(self.rendered(operation, sql))
    }

    /// Renders CREATE INDEX on the builder's table.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::MissingTable`] when no table is set.
    pub fn create_index(&self, index_name: &str, columns: &[&str]) -> Result<String> {
        let table = self.require_table("CreateIndex")?;
        let sql = format!(
            "CREATE INDEX {} ON {} ({});",
            self.dialect.quote_table(index_name),
            self.dialect.quote_table(table),
            self.quote_columns(columns, ",")
        );
        Ok(self.rendered("CreateIndex", sql))
    }

    /// Renders DELETE FROM with WHERE, ORDER BY, LIMIT and OFFSET.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::MissingTable`] when no table is set.
    pub fn delete(&self) -> Result<String> {
        let table = self.require_table("Delete")?;
        let sql = format!(
            "DELETE FROM {}{}{}{};",
            self.dialect.quote_table(table),
            compile_where(self.dialect, &self.wheres),
            compile_order_by(self.dialect, &self.order_by),
            compile_limit_offset(self.limit, self.offset)
        );
        Ok(self.rendered("Delete", sql))
    }

    /// Renders DROP VIEW when a view is set, DROP TABLE otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::MissingTableOrView`] when neither is set.
    pub fn drop(&self) -> Result<String> {
        self.render_drop(false, "Drop")
    }

    /// Renders DROP ... IF EXISTS.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::MissingTableOrView`] when neither is set.
    pub fn drop_if_exists(&self) -> Result<String> {
        self.render_drop(true, "DropIfExists")
    }

    fn render_drop(&self, if_exists: bool, operation: &'static str) -> Result<String> {
        let (kind, name) = match (&self.view, &self.table) {
            (Some(view), _) => ("VIEW", view),
            (None, Some(table)) => ("TABLE", table),
            (None, None) => return Err(BuildError::MissingTableOrView { operation }),
        };
        let if_exists = if if_exists { "IF EXISTS " } else { "" };
        let sql = format!(
            "DROP {kind} {if_exists}{};",
            self.dialect.quote_table(name)
        );
        Ok(self.rendered(operation, sql))
    }

    /// Renders SELECT. An empty column list selects `*`; columns containing
    /// `(` are treated as expressions and left unquoted.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::MissingTable`] when no table is set.
    pub fn select(&self, columns: &[&str]) -> Result<String> {
        let table = self.require_table("Select")?;
        let columns = if columns.is_empty() {
            "*".to_string()
        } else {
            columns
                .iter()
                .map(|c| {
                    if c.contains('(') {
                        (*c).to_string()
                    } else {
                        self.dialect.quote_column(c)
                    }
                })
                .collect::<Vec<_>>()
                .join(", ")
        };
        let sql = format!(
            "SELECT {columns} FROM {}{}{}{}{};",
            self.dialect.quote_table(table),
            compile_where(self.dialect, &self.wheres),
            compile_group_by(self.dialect, &self.group_by),
            compile_order_by(self.dialect, &self.order_by),
            compile_limit_offset(self.limit, self.offset)
        );
        Ok(self.rendered("Select", sql))
    }

    /// Renders INSERT. Columns are emitted in lexicographic order.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::MissingTable`] when no table is set.
    pub fn insert<I, K, V>(&self, values: I) -> Result<String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let table = self.require_table("Insert")?;
        let values = sorted(values);
        let names: Vec<String> = values
            .keys()
            .map(|k| self.dialect.quote_column(k))
            .collect();
        let literals: Vec<String> = values
            .values()
            .map(|v| self.dialect.quote_value(v))
            .collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({}){};",
            self.dialect.quote_table(table),
            names.join(", "),
            literals.join(", "),
            compile_limit_offset(self.limit, self.offset)
        );
        Ok(self.rendered("Insert", sql))
    }

    /// Renders UPDATE. Assignments are emitted in lexicographic column order.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::MissingTable`] when no table is set.
    pub fn update<I, K, V>(&self, values: I) -> Result<String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let table = self.require_table("Update")?;
        let assignments: Vec<String> = sorted(values)
            .iter()
            .map(|(k, v)| {
                format!(
                    "{}={}",
                    self.dialect.quote_column(k),
                    self.dialect.quote_value(v)
                )
            })
            .collect();
        let sql = format!(
            "UPDATE {} SET {}{}{}{}{};",
            self.dialect.quote_table(table),
            assignments.join(", "),
            compile_where(self.dialect, &self.wheres),
            compile_group_by(self.dialect, &self.group_by),
            compile_order_by(self.dialect, &self.order_by),
            compile_limit_offset(self.limit, self.offset)
        );
        Ok(self.rendered("Update", sql))
    }

    /// Renders a table rename.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Unsupported`] when the dialect cannot rename tables.
    pub fn table_rename(&self, old_name: &str, new_name: &str) -> Result<String> {
        let sql = self.dialect.rename_table(old_name, new_name)?;
        Ok(self.rendered("TableRename", sql))
    }

    /// Renders adding a column to a table.
    ///
    /// # Errors
    ///
    /// Fails when the column is invalid (see [`Column::validate`]) or the
    /// dialect cannot add columns.
    pub fn table_column_add(&self, table: &str, column: &Column) -> Result<String> {
        column.validate()?;
        let sql = self.dialect.add_column(table, column)?;
        Ok(self.rendered("TableColumnAdd", sql))
    }

    /// Renders changing a column definition.
    ///
    /// # Errors
    ///
    /// Fails when the column is invalid (see [`Column::validate`]) or the
    /// dialect cannot change columns.
    pub fn table_column_change(&self, table: &str, column: &Column) -> Result<String> {
        column.validate()?;
        let sql = self.dialect.change_column(table, column)?;
        Ok(self.rendered("TableColumnChange", sql))
    }

    /// Renders dropping a column.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Unsupported`] when the dialect cannot drop columns.
    pub fn table_column_drop(&self, table: &str, column: &str) -> Result<String> {
        let sql = self.dialect.drop_column(table, column)?;
        Ok(self.rendered("TableColumnDrop", sql))
    }

    /// Renders renaming a column.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Unsupported`] when the dialect cannot rename columns.
    pub fn table_column_rename(
        &self,
        table: &str,
        old_name: &str,
        new_name: &str,
    ) -> Result<String> {
        let sql = self.dialect.rename_column(table, old_name, new_name)?;
        Ok(self.rendered("TableColumnRename", sql))
    }

    /// Returns the parametrized query checking whether a column exists.
    ///
    /// The query yields a row (or a true value on postgres) when the column
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Unsupported`] on dialects without a metadata query.
    pub fn table_column_exists(&self, table: &str, column: &str) -> Result<ParameterizedQuery> {
        let query = self.dialect.column_exists(table, column)?;
        debug!(
            dialect = self.dialect.name(),
            operation = "TableColumnExists",
            sql = %query.sql,
            "rendered statement"
        );
        Ok(query)
    }

    fn require_table(&self, operation: &'static str) -> Result<&str> {
        self.table
            .as_deref()
            .ok_or(BuildError::MissingTable { operation })
    }

    fn quote_columns<S: AsRef<str>>(&self, columns: &[S], separator: &str) -> String {
        columns
            .iter()
            .map(|c| self.dialect.quote_column(c.as_ref()))
            .collect::<Vec<_>>()
            .join(separator)
    }

    fn rendered(&self, operation: &'static str, sql: String) -> String {
        debug!(dialect = self.dialect.name(), operation, sql = %sql, "rendered statement");
        sql
    }
}

impl From<Dialect> for Builder {
    fn from(dialect: Dialect) -> Self {
        Self::new(dialect)
    }
}

fn sorted<I, K, V>(values: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    values
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
