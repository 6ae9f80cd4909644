//! Building blocks for schema introspection.
//!
//! Executing metadata queries is left to driver crates. This module holds the
//! driver-agnostic half: parsing native type strings such as
//! `decimal(10,2)`, mapping native types back to [`ColumnType`]
//! ("commonization"), and the parametrized check returned by
//! [`Builder::table_column_exists`](crate::Builder::table_column_exists).

use std::collections::HashMap;

use crate::error::{BuildError, Result};
use crate::schema::{Column, ColumnType};

/// One row of a metadata query, keyed by result column name.
///
/// Every cell is text; NULL cells are empty strings.
pub type MetadataRow = HashMap<String, String>;

/// A query template plus its positional bind values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterizedQuery {
    /// SQL text using the dialect's placeholder style.
    pub sql: String,
    /// Values to bind, in placeholder order.
    pub params: Vec<String>,
}

impl ParameterizedQuery {
    /// Creates a new parametrized query.
    #[must_use]
    pub fn new(sql: impl Into<String>, params: Vec<String>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}

/// A native type string split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawColumnType {
    /// Lowercase type name without arguments, e.g. `varchar`.
    pub base: String,
    /// First numeric argument.
    pub length: Option<u32>,
    /// Second numeric argument.
    pub decimals: Option<u32>,
}

impl RawColumnType {
    /// Parses `name`, `name(length)` or `name(length,decimals)`.
    ///
    /// Non-numeric arguments (such as `enum('a','b')`) are dropped.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim().to_ascii_lowercase();
        let Some((base, rest)) = raw.split_once('(') else {
            return Self {
                base: raw,
                length: None,
                decimals: None,
            };
        };

        let props = rest.split_once(')').map_or(rest, |(inside, _)| inside);
        let (length, decimals) = match props.split_once(',') {
            Some((length, decimals)) => (parse_number(length), parse_number(decimals)),
            None => (parse_number(props), None),
        };

        Self {
            base: base.trim().to_string(),
            length,
            decimals,
        }
    }
}

fn parse_number(s: &str) -> Option<u32> {
    s.trim().parse().ok()
}

/// Returns the cell for `key`, or an empty string when absent.
#[must_use]
pub fn field<'a>(row: &'a MetadataRow, key: &str) -> &'a str {
    row.get(key).map_or("", String::as_str)
}

/// Maps a MySQL base type to an abstract column type.
///
/// # Errors
///
/// Returns [`BuildError::MissingColumnType`] for a blank type name.
pub fn commonize_mysql(base: &str) -> Result<ColumnType> {
    Ok(if base.contains("int") {
        ColumnType::Integer
    } else if base.contains("char") {
        ColumnType::String
    } else if base.contains("text") {
        ColumnType::Text
    } else if base.contains("float") {
        ColumnType::Float
    } else if base.contains("blob") {
        ColumnType::Blob
    } else {
        base.parse()?
    })
}

/// Maps a SQLite base type to an abstract column type.
///
/// SQLite reports `TEXT` for string columns too, so a text column that
/// declares a length is treated as a string.
///
/// # Errors
///
/// Returns [`BuildError::MissingColumnType`] for a blank type name.
pub fn commonize_sqlite(base: &str, length: Option<u32>) -> Result<ColumnType> {
    Ok(if base.contains("int") {
        ColumnType::Integer
    } else if base.contains("char") {
        ColumnType::String
    } else if base.contains("text") {
        if length.is_some_and(|n| n > 0) {
            ColumnType::String
        } else {
            ColumnType::Text
        }
    } else if base.contains("real") {
        ColumnType::Float
    } else if base.contains("blob") {
        ColumnType::Blob
    } else {
        base.parse()?
    })
}

/// Builds a column from introspected parts.
///
/// # Errors
///
/// Returns [`BuildError::MissingColumnName`] for a blank name.
pub fn introspected_column(
    name: &str,
    column_type: ColumnType,
    raw: &RawColumnType,
    default: &str,
) -> Result<Column> {
    if name.trim().is_empty() {
        return Err(BuildError::MissingColumnName);
    }
    let mut column = Column::new(name, column_type);
    column.length = raw.length;
    column.decimals = raw.decimals;
    if !default.is_empty() {
        column.default = Some(default.to_string());
    }
    Ok(column)
}
