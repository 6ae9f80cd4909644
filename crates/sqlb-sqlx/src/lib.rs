//! # sqlb-sqlx
//!
//! Runs statements rendered by [`sqlb_core`] against a live database
//! through sqlx's `Any` driver.
//!
//! [`Database`] wraps a connection pool bound to one dialect. It executes
//! statements, tracks a single explicit transaction, keeps an optional log
//! of executed SQL and reads table schemas back as [`Column`]s.
//!
//! ```no_run
//! use sqlb_sqlx::{Database, DatabaseConfig};
//! use sqlb_core::{Column, ColumnType};
//!
//! # async fn run() -> sqlb_sqlx::Result<()> {
//! let db = Database::connect(&DatabaseConfig::new("sqlite://app.db")).await?;
//! db.table_create(
//!     "users",
//!     &[
//!         Column::new("id", ColumnType::Integer).primary_key(),
//!         Column::new("email", ColumnType::String).length(255).unique(),
//!     ],
//! )
//! .await?;
//!
//! let insert = db.builder().table("users").insert([("email", "a@example.com")])?;
//! db.exec(&insert).await?;
//!
//! assert!(db.table_column_exists("users", "email").await?);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod schema;
pub mod sql_log;

pub use config::{DatabaseConfig, load_columns};
pub use database::Database;
pub use error::{DbError, Result};
pub use schema::{
    table_create_if_not_exists_sql, table_create_sql, table_drop_if_exists_sql, table_drop_sql,
};
pub use sql_log::{SqlLog, SqlLogEntry};

pub use sqlb_core::{Column, ColumnType, Dialect};
