//! Microsoft SQL Server dialect.

use super::{decimal_sql, with_length, Dialect, SqlDialect};
use crate::error::Result;
use crate::schema::{Column, ColumnType};

/// SQL Server dialect.
///
/// Table-level identifiers use brackets (`[users]`); column identifiers and
/// column definitions use double quotes. Renames go through `sp_rename`
/// and the if-not-exists table form is guarded by `OBJECT_ID`.
/// There is no column-exists check or introspection support.
#[derive(Debug, Clone, Copy, Default)]
pub struct MsSqlDialect;

impl SqlDialect for MsSqlDialect {
    fn dialect(&self) -> Dialect {
        Dialect::MsSql
    }

    fn table_quote(&self) -> (char, char) {
        ('[', ']')
    }

    fn column_type_sql(&self, column: &Column) -> String {
        let keyword = match &column.column_type {
            ColumnType::String => "NVARCHAR",
            ColumnType::Integer => "INTEGER",
            ColumnType::Float => "FLOAT",
            ColumnType::Text => "TEXT",
            ColumnType::Blob => return "VARBINARY(MAX)".to_string(),
            ColumnType::Date => "DATE",
            ColumnType::DateTime => "DATETIME2",
            ColumnType::Decimal => return decimal_sql(column),
            // No native mapping: the abstract name goes through as-is.
            ColumnType::LongText => "longtext",
            ColumnType::Custom(name) => name,
        };
        with_length(keyword, column.effective_length())
    }

    /// SQL Server has no `CREATE TABLE IF NOT EXISTS`; the guarded form
    /// checks `OBJECT_ID` first.
    fn create_table(&self, table: &str, columns_sql: &str, if_not_exists: bool) -> String {
        let quoted = self.quote_table(table);
        let create = format!("CREATE TABLE {quoted} ({columns_sql});");
        if if_not_exists {
            format!(
                "IF OBJECT_ID(N{}, N'U') IS NULL {create}",
                self.quote_value(&quoted)
            )
        } else {
            create
        }
    }

    fn rename_table(&self, old_name: &str, new_name: &str) -> Result<String> {
        Ok(format!(
            "EXEC sp_rename {}, {}, 'OBJECT';",
            self.quote_table(old_name),
            self.quote_table(new_name)
        ))
    }

    fn rename_column(&self, table: &str, old_name: &str, new_name: &str) -> Result<String> {
        Ok(format!(
            "EXEC sp_rename {}.{}, {}, 'COLUMN';",
            self.quote_table(table),
            self.quote_table(old_name),
            self.quote_table(new_name)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mssql_quoting() {
        assert_eq!(MsSqlDialect.quote_table("dbo.users"), "[dbo].[users]");
        assert_eq!(MsSqlDialect.quote_column("email"), "\"email\"");
        assert_eq!(MsSqlDialect.quote_value("O'Brien"), "'O''Brien'");
    }

    #[test]
    fn test_mssql_types() {
        let d = MsSqlDialect;
        assert_eq!(
            d.column_type_sql(&Column::new("a", ColumnType::String).length(40)),
            "NVARCHAR(40)"
        );
        assert_eq!(
            d.column_type_sql(&Column::new("a", ColumnType::Blob).length(10)),
            "VARBINARY(MAX)"
        );
        assert_eq!(
            d.column_type_sql(&Column::new("a", ColumnType::LongText)),
            "longtext"
        );
    }

    #[test]
    fn test_mssql_create_if_not_exists_uses_object_id() {
        assert_eq!(
            MsSqlDialect.create_table("users", "\"id\" INTEGER", true),
            "IF OBJECT_ID(N'[users]', N'U') IS NULL CREATE TABLE [users] (\"id\" INTEGER);"
        );
        assert_eq!(
            MsSqlDialect.create_table("o'neil", "\"id\" INTEGER", true),
            "IF OBJECT_ID(N'[o''neil]', N'U') IS NULL CREATE TABLE [o'neil] (\"id\" INTEGER);"
        );
    }

    #[test]
    fn test_mssql_renames() {
        assert_eq!(
            MsSqlDialect.rename_table("users", "members").unwrap(),
            "EXEC sp_rename [users], [members], 'OBJECT';"
        );
        assert_eq!(
            MsSqlDialect
                .rename_column("users", "email", "mail")
                .unwrap(),
            "EXEC sp_rename [users].[email], [mail], 'COLUMN';"
        );
    }

    #[test]
    fn test_mssql_column_exists_unsupported() {
        let err = MsSqlDialect.column_exists("users", "email").unwrap_err();
        assert_eq!(
            err.to_string(),
            "checking whether a column exists is not supported for driver mssql"
        );
    }
}
