#![allow(dead_code)]

use sqlb_core::{Builder, Column, ColumnType, Dialect, Where};

/// The `users` table used across the CREATE TABLE tests.
pub fn users_columns() -> Vec<Column> {
    vec![
        Column::new("id", ColumnType::String).length(40).primary_key(),
        Column::new("email", ColumnType::String).length(255).unique(),
        Column::new("image", ColumnType::Blob),
        Column::new("price_default", ColumnType::Decimal),
        Column::new("price_custom", ColumnType::Decimal)
            .length(12)
            .decimals(10),
        Column::new("short_description", ColumnType::Text),
        Column::new("long_description", ColumnType::LongText),
        Column::new("created_at", ColumnType::DateTime),
        Column::new("deleted_at", ColumnType::DateTime).nullable(),
    ]
}

/// A builder on `users` with every column of [`users_columns`].
pub fn users_table(dialect: Dialect) -> Builder {
    users_columns()
        .into_iter()
        .try_fold(Builder::new(dialect).table("users"), Builder::column)
        .unwrap_or_else(|e| panic!("Failed to add column: {e}"))
}

/// The fully loaded SELECT used by the per-dialect select tests.
pub fn full_select(dialect: Dialect) -> String {
    Builder::new(dialect)
        .table("users")
        .where_clause(Where::new("first_name", "!=", "Jane"))
        .group_by("passport")
        .order_by("first_name", "asc")
        .limit(10)
        .offset(20)
        .select(&["id", "first_name", "last_name"])
        .unwrap_or_else(|e| panic!("Failed to render SELECT: {e}"))
}
