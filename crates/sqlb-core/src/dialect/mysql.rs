//! MySQL dialect.

use super::{decimal_sql, with_length, Dialect, SqlDialect};
use crate::error::Result;
use crate::introspect::{
    commonize_mysql, field, introspected_column, MetadataRow, ParameterizedQuery, RawColumnType,
};
use crate::schema::{Column, ColumnType};

/// MySQL (and MariaDB) dialect.
///
/// Identifiers are quoted with backticks and string literals with double
/// quotes. Strings default to `VARCHAR(255)` and integers to `BIGINT(20)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlDialect;

impl SqlDialect for MySqlDialect {
    fn dialect(&self) -> Dialect {
        Dialect::MySql
    }

    fn column_quote(&self) -> (char, char) {
        ('`', '`')
    }

    fn value_quote(&self) -> char {
        '"'
    }

    fn column_type_sql(&self, column: &Column) -> String {
        let length = column.effective_length();
        match &column.column_type {
            ColumnType::String => with_length("VARCHAR", Some(length.unwrap_or(255))),
            ColumnType::Integer => with_length("BIGINT", Some(length.unwrap_or(20))),
            ColumnType::Float => with_length("DOUBLE", length),
            ColumnType::Text | ColumnType::LongText => with_length("LONGTEXT", length),
            ColumnType::Blob => with_length("LONGBLOB", length),
            ColumnType::Date => with_length("DATE", length),
            ColumnType::DateTime => with_length("DATETIME", length),
            ColumnType::Decimal => decimal_sql(column),
            ColumnType::Custom(name) => with_length(name, length),
        }
    }

    fn auto_increment_keyword(&self) -> &'static str {
        "AUTO_INCREMENT"
    }

    fn create_view_keywords(&self, if_not_exists: bool) -> &'static str {
        if if_not_exists {
            "CREATE OR REPLACE VIEW"
        } else {
            "CREATE VIEW"
        }
    }

    fn rename_table(&self, old_name: &str, new_name: &str) -> Result<String> {
        Ok(format!(
            "ALTER TABLE {} RENAME {};",
            self.quote_table(old_name),
            self.quote_table(new_name)
        ))
    }

    fn change_column(&self, table: &str, column: &Column) -> Result<String> {
        Ok(format!(
            "ALTER TABLE {} MODIFY COLUMN {};",
            self.quote_table(table),
            self.column_definition(column)
        ))
    }

    fn column_exists(&self, table: &str, column: &str) -> Result<ParameterizedQuery> {
        Ok(ParameterizedQuery::new(
            "SELECT 1 FROM information_schema.COLUMNS WHERE TABLE_NAME = ? AND COLUMN_NAME = ?",
            vec![table.to_string(), column.to_string()],
        ))
    }

    fn describe_table(&self, table: &str) -> Result<String> {
        Ok(format!("DESCRIBE {};", self.quote_table(table)))
    }

    fn column_from_metadata(&self, row: &MetadataRow, commonize: bool) -> Result<Column> {
        let raw = RawColumnType::parse(field(row, "Type"));
        let column_type = if commonize {
            commonize_mysql(&raw.base)?
        } else {
            raw.base.parse()?
        };

        let mut column =
            introspected_column(field(row, "Field"), column_type, &raw, field(row, "Default"))?;
        let key = field(row, "Key");
        column.primary_key = key == "PRI";
        column.unique = key == "UNI";
        column.nullable = field(row, "Null") == "YES";
        column.auto_increment = field(row, "Extra").contains("auto_increment");
        Ok(column)
    }
}
