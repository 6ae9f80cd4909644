//! SQLite dialect.

use super::{decimal_sql, with_length, Dialect, SqlDialect};
use crate::error::Result;
use crate::introspect::{
    commonize_sqlite, field, introspected_column, MetadataRow, ParameterizedQuery, RawColumnType,
};
use crate::schema::{Column, ColumnType};

/// SQLite dialect.
///
/// Identifiers are quoted with double quotes and string literals with single
/// quotes. Lengths are kept on `TEXT(n)` even though SQLite ignores them,
/// which lets introspection tell strings from text columns.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

impl SqlDialect for SqliteDialect {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn column_type_sql(&self, column: &Column) -> String {
        let keyword = match &column.column_type {
            ColumnType::String | ColumnType::Text | ColumnType::LongText => "TEXT",
            ColumnType::Integer => "INTEGER",
            ColumnType::Float => "REAL",
            ColumnType::Blob => "BLOB",
            ColumnType::Date => "DATE",
            ColumnType::DateTime => "DATETIME",
            ColumnType::Decimal => return decimal_sql(column),
            ColumnType::Custom(name) => name,
        };
        with_length(keyword, column.effective_length())
    }

    fn add_column(&self, table: &str, column: &Column) -> Result<String> {
        Ok(format!(
            "ALTER TABLE {} ADD COLUMN {};",
            self.quote_table(table),
            self.column_definition(column)
        ))
    }

    fn column_exists(&self, table: &str, column: &str) -> Result<ParameterizedQuery> {
        Ok(ParameterizedQuery::new(
            "SELECT 1 FROM pragma_table_info(?) WHERE name = ?",
            vec![table.to_string(), column.to_string()],
        ))
    }

    fn describe_table(&self, table: &str) -> Result<String> {
        Ok(format!("PRAGMA table_info({});", self.quote_table(table)))
    }

    fn column_from_metadata(&self, row: &MetadataRow, commonize: bool) -> Result<Column> {
        let raw = RawColumnType::parse(field(row, "type"));
        let column_type = if commonize {
            commonize_sqlite(&raw.base, raw.length)?
        } else {
            raw.base.parse()?
        };

        let mut column =
            introspected_column(field(row, "name"), column_type, &raw, field(row, "dflt_value"))?;
        column.primary_key = field(row, "pk") == "1";
        column.nullable = field(row, "notnull") == "0";
        // INTEGER PRIMARY KEY aliases the rowid.
        column.auto_increment = column.primary_key && raw.base == "integer";
        Ok(column)
    }
}
