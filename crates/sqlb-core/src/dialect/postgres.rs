//! PostgreSQL dialect.

use super::{decimal_sql, with_length, Dialect, SqlDialect};
use crate::error::Result;
use crate::introspect::ParameterizedQuery;
use crate::schema::{Column, ColumnType};

/// PostgreSQL dialect.
///
/// Identifiers are quoted with double quotes, and so are string literals.
/// `TEXT` never takes a length. Auto-increment is rendered as a trailing
/// `SERIAL` keyword after the base type.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl SqlDialect for PostgresDialect {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    fn value_quote(&self) -> char {
        '"'
    }

    fn column_type_sql(&self, column: &Column) -> String {
        let keyword = match &column.column_type {
            ColumnType::String | ColumnType::Text | ColumnType::LongText => "TEXT",
            ColumnType::Integer => "INTEGER",
            ColumnType::Float => "REAL",
            ColumnType::Blob => "BYTEA",
            ColumnType::Date => "DATE",
            ColumnType::DateTime => "TIMESTAMP",
            ColumnType::Decimal => return decimal_sql(column),
            ColumnType::Custom(name) => name,
        };
        if keyword == "TEXT" {
            return keyword.to_string();
        }
        with_length(keyword, column.effective_length())
    }

    fn auto_increment_keyword(&self) -> &'static str {
        "SERIAL"
    }

    fn column_exists(&self, table: &str, column: &str) -> Result<ParameterizedQuery> {
        Ok(ParameterizedQuery::new(
            "SELECT EXISTS (SELECT 1 FROM information_schema.columns WHERE table_name = $1 AND column_name = $2)",
            vec![table.to_string(), column.to_string()],
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postgres_text_ignores_length() {
        let col = Column::new("id", ColumnType::String).length(40);
        assert_eq!(PostgresDialect.column_type_sql(&col), "TEXT");
    }

    #[test]
    fn test_postgres_serial_is_trailing() {
        let col = Column::new("id", ColumnType::Integer)
            .auto_increment()
            .primary_key();
        assert_eq!(
            PostgresDialect.column_definition(&col),
            "\"id\" INTEGER SERIAL PRIMARY KEY NOT NULL"
        );
    }

    #[test]
    fn test_postgres_add_column() {
        let col = Column::new("age", ColumnType::Integer).nullable();
        assert_eq!(
            PostgresDialect.add_column("users", &col).unwrap(),
            "ALTER TABLE \"users\" ADD \"age\" INTEGER;"
        );
    }

    #[test]
    fn test_postgres_column_exists_placeholders() {
        let q = PostgresDialect.column_exists("users", "email").unwrap();
        assert!(q.sql.contains("$1") && q.sql.contains("$2"));
        assert_eq!(q.params, vec!["users".to_string(), "email".to_string()]);
    }

    #[test]
    fn test_postgres_introspection_unsupported() {
        let err = PostgresDialect.describe_table("users").unwrap_err();
        assert!(err.is_unsupported());
    }
}
