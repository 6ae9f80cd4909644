//! # sqlb-core
//!
//! A dialect-aware SQL statement builder.
//!
//! One [`Builder`] API renders DDL and DML for MySQL, PostgreSQL, SQLite and
//! SQL Server. Everything that differs between databases (identifier
//! quoting, value escaping, type mapping, ALTER TABLE syntax) lives in one
//! [`SqlDialect`] strategy per database, chosen when the builder is created.
//!
//! This crate only produces SQL text. It performs no I/O; executing the
//! statements is left to a driver crate such as `sqlb-sqlx`.
//!
//! ## Building statements
//!
//! ```rust
//! use sqlb_core::{Builder, Dialect, Where};
//!
//! let sql = Builder::new(Dialect::MySql)
//!     .table("users")
//!     .where_clause(Where::new("first_name", "!=", "Jane"))
//!     .order_by("first_name", "asc")
//!     .limit(10)
//!     .offset(20)
//!     .select(&["id", "first_name"])
//!     .unwrap();
//!
//! assert_eq!(
//!     sql,
//!     "SELECT `id`, `first_name` FROM `users` WHERE `first_name` <> \"Jane\" ORDER BY `first_name` ASC LIMIT 10 OFFSET 20;"
//! );
//! ```
//!
//! ## Values are escaped
//!
//! Values are rendered as quoted literals with embedded quote characters
//! doubled, so user input cannot terminate the literal:
//!
//! ```rust
//! use sqlb_core::{Builder, Dialect, Where};
//!
//! let sql = Builder::new(Dialect::Sqlite)
//!     .table("users")
//!     .where_clause(Where::new("id", "=", "58' OR 1 = 1;--"))
//!     .select(&[])
//!     .unwrap();
//!
//! assert_eq!(sql, r#"SELECT * FROM "users" WHERE "id" = '58'' OR 1 = 1;--';"#);
//! ```
//!
//! ## Errors
//!
//! Rendering returns [`BuildError`]. Missing tables or column names are
//! precondition errors; DDL a dialect cannot express is reported as
//! [`BuildError::Unsupported`] so migration tooling can fall back.

pub mod builder;
pub mod dialect;
pub mod error;
pub mod introspect;
pub mod schema;

pub use builder::{Builder, Direction, Linkage, OrderBy, Where};
pub use dialect::{Dialect, SqlDialect};
pub use error::{BuildError, Result};
pub use introspect::{MetadataRow, ParameterizedQuery};
pub use schema::{Column, ColumnType};
