//! ALTER TABLE family and the column-exists check.

use sqlb_core::{BuildError, Builder, Column, ColumnType, Dialect, ParameterizedQuery};

fn name_column() -> Column {
    Column::new("name", ColumnType::String).nullable()
}

#[test]
fn test_column_add_sqlite_scenario() {
    let sql = Builder::new(Dialect::Sqlite)
        .table_column_add("users", &name_column())
        .unwrap();
    assert_eq!(sql, r#"ALTER TABLE "users" ADD COLUMN "name" TEXT;"#);
}

#[test]
fn test_column_add_with_length() {
    let column = Column::new("name", ColumnType::String).length(255).nullable();
    assert_eq!(
        Builder::new(Dialect::Sqlite)
            .table_column_add("table_name", &column)
            .unwrap(),
        r#"ALTER TABLE "table_name" ADD COLUMN "name" TEXT(255);"#
    );
}

#[test]
fn test_column_add_per_dialect() {
    let column = name_column();
    assert_eq!(
        Builder::new(Dialect::MySql)
            .table_column_add("users", &column)
            .unwrap(),
        "ALTER TABLE `users` ADD `name` VARCHAR(255);"
    );
    assert_eq!(
        Builder::new(Dialect::Postgres)
            .table_column_add("users", &column)
            .unwrap(),
        r#"ALTER TABLE "users" ADD "name" TEXT;"#
    );
    assert_eq!(
        Builder::new(Dialect::MsSql)
            .table_column_add("users", &column)
            .unwrap(),
        r#"ALTER TABLE [users] ADD "name" NVARCHAR;"#
    );
}

#[test]
fn test_column_add_requires_name() {
    let err = Builder::new(Dialect::Sqlite)
        .table_column_add("users", &Column::new("", ColumnType::Text))
        .unwrap_err();
    assert_eq!(err, BuildError::MissingColumnName);
}

#[test]
fn test_column_add_and_change_require_type() {
    let untyped = Column::new("age", ColumnType::Custom(String::new()));
    for dialect in Dialect::ALL {
        let builder = Builder::new(dialect);
        assert_eq!(
            builder.table_column_add("users", &untyped).unwrap_err(),
            BuildError::MissingColumnType,
            "add on {dialect}"
        );
        assert_eq!(
            builder.table_column_change("users", &untyped).unwrap_err(),
            BuildError::MissingColumnType,
            "change on {dialect}"
        );
    }
}

#[test]
fn test_column_change() {
    let column = Column::new("email", ColumnType::String).length(320);
    assert_eq!(
        Builder::new(Dialect::MySql)
            .table_column_change("users", &column)
            .unwrap(),
        "ALTER TABLE `users` MODIFY COLUMN `email` VARCHAR(320) NOT NULL;"
    );
    assert_eq!(
        Builder::new(Dialect::Postgres)
            .table_column_change("users", &column)
            .unwrap(),
        r#"ALTER TABLE "users" ALTER COLUMN "email" TEXT NOT NULL;"#
    );
    assert_eq!(
        Builder::new(Dialect::MsSql)
            .table_column_change("users", &column)
            .unwrap(),
        r#"ALTER TABLE [users] ALTER COLUMN "email" NVARCHAR(320) NOT NULL;"#
    );
}

#[test]
fn test_column_drop() {
    assert_eq!(
        Builder::new(Dialect::Sqlite)
            .table_column_drop("users", "name")
            .unwrap(),
        r#"ALTER TABLE "users" DROP COLUMN "name";"#
    );
    assert_eq!(
        Builder::new(Dialect::MySql)
            .table_column_drop("users", "name")
            .unwrap(),
        "ALTER TABLE `users` DROP COLUMN `name`;"
    );
    assert_eq!(
        Builder::new(Dialect::MsSql)
            .table_column_drop("users", "name")
            .unwrap(),
        r#"ALTER TABLE [users] DROP COLUMN "name";"#
    );
}

#[test]
fn test_column_rename() {
    assert_eq!(
        Builder::new(Dialect::Sqlite)
            .table_column_rename("users", "email", "name")
            .unwrap(),
        r#"ALTER TABLE "users" RENAME COLUMN "email" TO "name";"#
    );
    assert_eq!(
        Builder::new(Dialect::MySql)
            .table_column_rename("users", "email", "name")
            .unwrap(),
        "ALTER TABLE `users` RENAME COLUMN `email` TO `name`;"
    );
    assert_eq!(
        Builder::new(Dialect::MsSql)
            .table_column_rename("users", "email", "name")
            .unwrap(),
        "EXEC sp_rename [users].[email], [name], 'COLUMN';"
    );
}

#[test]
fn test_table_rename() {
    let rename = |dialect| {
        Builder::new(dialect)
            .table_rename("users", "members")
            .unwrap()
    };
    assert_eq!(rename(Dialect::MySql), "ALTER TABLE `users` RENAME `members`;");
    assert_eq!(
        rename(Dialect::Postgres),
        r#"ALTER TABLE "users" RENAME TO "members";"#
    );
    assert_eq!(
        rename(Dialect::Sqlite),
        r#"ALTER TABLE "users" RENAME TO "members";"#
    );
    assert_eq!(
        rename(Dialect::MsSql),
        "EXEC sp_rename [users], [members], 'OBJECT';"
    );
}

#[test]
fn test_column_exists_queries() {
    assert_eq!(
        Builder::new(Dialect::MySql)
            .table_column_exists("users", "email")
            .unwrap(),
        ParameterizedQuery::new(
            "SELECT 1 FROM information_schema.COLUMNS WHERE TABLE_NAME = ? AND COLUMN_NAME = ?",
            vec!["users".into(), "email".into()],
        )
    );
    assert_eq!(
        Builder::new(Dialect::Postgres)
            .table_column_exists("users", "email")
            .unwrap()
            .sql,
        "SELECT EXISTS (SELECT 1 FROM information_schema.columns WHERE table_name = $1 AND column_name = $2)"
    );
    assert_eq!(
        Builder::new(Dialect::Sqlite)
            .table_column_exists("users", "email")
            .unwrap()
            .sql,
        "SELECT 1 FROM pragma_table_info(?) WHERE name = ?"
    );
}

#[test]
fn test_column_exists_unsupported_is_recoverable() {
    let err = Builder::new(Dialect::MsSql)
        .table_column_exists("users", "email")
        .unwrap_err();
    assert!(err.is_unsupported());
    assert!(!err.is_precondition());
    assert!(err.to_string().contains("not supported for driver mssql"));
    assert_eq!(
        err,
        BuildError::Unsupported {
            operation: "checking whether a column exists",
            dialect: Dialect::MsSql,
        }
    );
}
