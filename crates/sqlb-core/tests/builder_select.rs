//! SELECT rendering, predicates and injection safety.

mod common;

use common::full_select;
use sqlb_core::{BuildError, Builder, Dialect, Where};

#[test]
fn test_select_mysql_scenario() {
    let sql = Builder::new(Dialect::MySql)
        .table("users")
        .where_clause(Where::new("first_name", "!=", "Jane"))
        .order_by("first_name", "asc")
        .limit(10)
        .offset(20)
        .select(&["id", "first_name"])
        .unwrap();
    assert_eq!(
        sql,
        "SELECT `id`, `first_name` FROM `users` WHERE `first_name` <> \"Jane\" ORDER BY `first_name` ASC LIMIT 10 OFFSET 20;"
    );
}

#[test]
fn test_select_all_columns() {
    assert_eq!(
        Builder::new(Dialect::MySql).table("users").select(&[]).unwrap(),
        "SELECT * FROM `users`;"
    );
    assert_eq!(
        Builder::new(Dialect::Postgres).table("users").select(&[]).unwrap(),
        r#"SELECT * FROM "users";"#
    );
    assert_eq!(
        Builder::new(Dialect::Sqlite).table("users").select(&["*"]).unwrap(),
        r#"SELECT * FROM "users";"#
    );
}

#[test]
fn test_select_full() {
    assert_eq!(
        full_select(Dialect::MySql),
        "SELECT `id`, `first_name`, `last_name` FROM `users` WHERE `first_name` <> \"Jane\" GROUP BY `passport` ORDER BY `first_name` ASC LIMIT 10 OFFSET 20;"
    );
    assert_eq!(
        full_select(Dialect::Postgres),
        r#"SELECT "id", "first_name", "last_name" FROM "users" WHERE "first_name" <> "Jane" GROUP BY "passport" ORDER BY "first_name" ASC LIMIT 10 OFFSET 20;"#
    );
    assert_eq!(
        full_select(Dialect::Sqlite),
        r#"SELECT "id", "first_name", "last_name" FROM "users" WHERE "first_name" <> 'Jane' GROUP BY "passport" ORDER BY "first_name" ASC LIMIT 10 OFFSET 20;"#
    );
}

#[test]
fn test_select_function_column_unquoted() {
    assert_eq!(
        Builder::new(Dialect::Sqlite)
            .table("users")
            .select(&["MIN(created_at)"])
            .unwrap(),
        r#"SELECT MIN(created_at) FROM "users";"#
    );
    assert_eq!(
        Builder::new(Dialect::Postgres)
            .table("users")
            .select(&["COUNT(u.id)", "u.name"])
            .unwrap(),
        r#"SELECT COUNT(u.id), "u"."name" FROM "users";"#
    );
}

#[test]
fn test_select_qualified_table() {
    assert_eq!(
        Builder::new(Dialect::Postgres)
            .table("public.users")
            .select(&["users.*"])
            .unwrap(),
        r#"SELECT "users".* FROM "public"."users";"#
    );
    assert_eq!(
        Builder::new(Dialect::MsSql)
            .table("dbo.users")
            .select(&["id"])
            .unwrap(),
        r#"SELECT "id" FROM [dbo].[users];"#
    );
}

#[test]
fn test_select_requires_table() {
    let err = Builder::new(Dialect::Postgres).select(&["id"]).unwrap_err();
    assert_eq!(
        err,
        BuildError::MissingTable {
            operation: "Select"
        }
    );
}

#[test]
fn test_clause_omission_has_no_artifacts() {
    for dialect in Dialect::ALL {
        let builder = Builder::new(dialect).table("t");
        for sql in [
            builder.select(&[]).unwrap(),
            builder.delete().unwrap(),
            builder.update([("a", "1")]).unwrap(),
        ] {
            assert!(!sql.contains("WHERE"), "{sql}");
            assert!(!sql.contains("ORDER BY"), "{sql}");
            assert!(!sql.contains("GROUP BY"), "{sql}");
            assert!(!sql.contains("LIMIT"), "{sql}");
            assert!(!sql.contains("OFFSET"), "{sql}");
            assert!(!sql.contains("  "), "{sql}");
            assert!(!sql.contains(" ;"), "{sql}");
        }
    }
}

#[test]
fn test_zero_limit_and_offset_omitted() {
    let sql = Builder::new(Dialect::Sqlite)
        .table("users")
        .limit(0)
        .offset(0)
        .select(&[])
        .unwrap();
    assert_eq!(sql, r#"SELECT * FROM "users";"#);
}

#[test]
fn test_injection_sqlite() {
    let sql = Builder::new(Dialect::Sqlite)
        .table("users")
        .where_clause(Where::new("id", "=", "58' OR 1 = 1;--"))
        .select(&[])
        .unwrap();
    assert_eq!(sql, r#"SELECT * FROM "users" WHERE "id" = '58'' OR 1 = 1;--';"#);
}

#[test]
fn test_injection_mysql() {
    let sql = Builder::new(Dialect::MySql)
        .table("users")
        .where_clause(Where::new("id", "=", "58\" OR 1 = 1;--"))
        .select(&[])
        .unwrap();
    assert_eq!(sql, "SELECT * FROM `users` WHERE `id` = \"58\"\" OR 1 = 1;--\";");
}

#[test]
fn test_injection_postgres() {
    let sql = Builder::new(Dialect::Postgres)
        .table("users")
        .where_clause(Where::new("id", "=", "58\" OR 1 = 1;--"))
        .select(&[])
        .unwrap();
    assert_eq!(sql, r#"SELECT * FROM "users" WHERE "id" = "58"" OR 1 = 1;--";"#);
}

#[test]
fn test_where_linkage_and_raw() {
    let sql = Builder::new(Dialect::Sqlite)
        .table("orders")
        .where_clause(Where::new("status", "=", "paid"))
        .where_clause(Where::new("status", "=", "shipped").or())
        .where_clause(Where::raw("AND total > 100"))
        .where_clause(Where::new("deleted_at", "==", "NULL"))
        .select(&["id"])
        .unwrap();
    assert_eq!(
        sql,
        r#"SELECT "id" FROM "orders" WHERE "status" = 'paid' OR "status" = 'shipped' AND total > 100 AND "deleted_at" IS NULL;"#
    );
}

#[test]
fn test_where_group() {
    let sql = Builder::new(Dialect::MySql)
        .table("users")
        .where_clause(Where::new("active", "=", "1"))
        .where_clause(Where::group(vec![
            Where::new("role", "=", "admin"),
            Where::new("role", "=", "owner").or(),
        ]))
        .order_by("created_at", "DESCENDING")
        .select(&["id"])
        .unwrap();
    assert_eq!(
        sql,
        "SELECT `id` FROM `users` WHERE `active` = \"1\" AND (`role` = \"admin\" OR `role` = \"owner\") ORDER BY `created_at` DESC;"
    );
}
