//! Connection wrapper that executes rendered statements.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use chrono::Utc;
use futures::future::BoxFuture;
use sqlx::any::{AnyPoolOptions, AnyRow};
use sqlx::{Any, AnyPool, Column as _, Row, Transaction};
use tracing::{debug, error, info, warn};

use sqlb_core::{Builder, Dialect, MetadataRow};

use crate::config::DatabaseConfig;
use crate::error::{DbError, Result};
use crate::sql_log::{SqlLog, SqlLogEntry};

/// A connection pool bound to one dialect.
///
/// Statements run on the pool unless a transaction was opened with
/// [`begin_transaction`](Self::begin_transaction), in which case they run
/// inside it until it is committed or rolled back. Outside a transaction
/// statements from different tasks run concurrently, up to the pool size.
pub struct Database {
    pool: AnyPool,
    dialect: Dialect,
    tx: tokio::sync::Mutex<Option<Transaction<'static, Any>>>,
    sql_log: Mutex<SqlLog>,
    sql_log_enabled: AtomicBool,
    debug: AtomicBool,
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("dialect", &self.dialect)
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

impl Database {
    /// Connects using the given configuration.
    ///
    /// # Errors
    ///
    /// Fails when the dialect cannot be resolved from the URL or the pool
    /// cannot connect.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let dialect = config.resolve_dialect()?;
        sqlx::any::install_default_drivers();
        let pool = AnyPoolOptions::new()
            .max_connections(config.effective_max_connections())
            .connect(&config.url)
            .await?;
        info!(dialect = %dialect, "Connected to database");

        let db = Self::new(pool, dialect);
        db.sql_log_enable(config.sql_log);
        db.debug_enable(config.debug);
        Ok(db)
    }

    /// Wraps an existing pool.
    #[must_use]
    pub fn new(pool: AnyPool, dialect: Dialect) -> Self {
        Self {
            pool,
            dialect,
            tx: tokio::sync::Mutex::new(None),
            sql_log: Mutex::new(SqlLog::new()),
            sql_log_enabled: AtomicBool::new(false),
            debug: AtomicBool::new(false),
        }
    }

    /// Returns the dialect of this connection.
    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Returns a statement builder for this connection's dialect.
    #[must_use]
    pub fn builder(&self) -> Builder {
        Builder::new(self.dialect)
    }

    /// Returns the underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &AnyPool {
        &self.pool
    }

    /// Returns true for MySQL and MariaDB connections.
    #[must_use]
    pub const fn is_mysql(&self) -> bool {
        matches!(self.dialect, Dialect::MySql)
    }

    /// Returns true for PostgreSQL connections.
    #[must_use]
    pub const fn is_postgres(&self) -> bool {
        matches!(self.dialect, Dialect::Postgres)
    }

    /// Returns true for SQLite connections.
    #[must_use]
    pub const fn is_sqlite(&self) -> bool {
        matches!(self.dialect, Dialect::Sqlite)
    }

    /// Returns true for SQL Server connections.
    #[must_use]
    pub const fn is_mssql(&self) -> bool {
        matches!(self.dialect, Dialect::MsSql)
    }

    /// Executes a statement and returns the number of affected rows.
    ///
    /// # Errors
    ///
    /// Returns the driver error when the statement fails.
    pub async fn exec(&self, sql: &str) -> Result<u64> {
        self.exec_with_params(sql, &[]).await
    }

    /// Executes a statement with positional string parameters.
    ///
    /// # Errors
    ///
    /// Returns the driver error when the statement fails.
    pub async fn exec_with_params(&self, sql: &str, params: &[String]) -> Result<u64> {
        self.trace(sql);
        let started = Instant::now();
        let executed_at = Utc::now();

        let mut query = sqlx::query(sql);
        for param in params {
            query = query.bind(param.as_str());
        }

        // The transaction lock is only held while running inside it.
        let mut tx = self.tx.lock().await;
        let result = if let Some(conn) = tx.as_mut() {
            query.execute(&mut **conn).await?
        } else {
            drop(tx);
            query.execute(&self.pool).await?
        };

        self.record(sql, started, executed_at);
        Ok(result.rows_affected())
    }

    /// Runs a query and returns the raw rows.
    ///
    /// # Errors
    ///
    /// Returns the driver error when the query fails.
    pub async fn query_rows(&self, sql: &str, params: &[String]) -> Result<Vec<AnyRow>> {
        self.trace(sql);
        let started = Instant::now();
        let executed_at = Utc::now();

        let mut query = sqlx::query(sql);
        for param in params {
            query = query.bind(param.as_str());
        }

        let mut tx = self.tx.lock().await;
        let rows = if let Some(conn) = tx.as_mut() {
            query.fetch_all(&mut **conn).await?
        } else {
            drop(tx);
            query.fetch_all(&self.pool).await?
        };

        self.record(sql, started, executed_at);
        Ok(rows)
    }

    /// Runs a query and returns every row as a map of column name to text.
    ///
    /// NULL becomes the empty string. Numbers and booleans use their
    /// display form and binary values are decoded lossily as UTF-8.
    ///
    /// # Errors
    ///
    /// Fails when the query fails or a cell cannot be decoded.
    pub async fn select_to_map_string(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Vec<MetadataRow>> {
        let rows = self.query_rows(sql, params).await?;
        rows.iter()
            .map(|row| {
                row.columns()
                    .iter()
                    .map(|column| {
                        let value = cell_to_string(row, column.ordinal())?;
                        Ok((column.name().to_string(), value))
                    })
                    .collect::<Result<MetadataRow>>()
            })
            .collect()
    }

    /// Opens a transaction. Later statements run inside it.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::TransactionInProgress`] when one is already open.
    pub async fn begin_transaction(&self) -> Result<()> {
        let mut tx = self.tx.lock().await;
        if tx.is_some() {
            return Err(DbError::TransactionInProgress);
        }
        *tx = Some(self.pool.begin().await?);
        info!(dialect = %self.dialect, "Transaction started");
        Ok(())
    }

    /// Commits the open transaction.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NoTransaction`] when none is open.
    pub async fn commit_transaction(&self) -> Result<()> {
        let tx = self.tx.lock().await.take().ok_or(DbError::NoTransaction)?;
        tx.commit().await?;
        info!(dialect = %self.dialect, "Transaction committed");
        Ok(())
    }

    /// Rolls back the open transaction.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NoTransaction`] when none is open.
    pub async fn rollback_transaction(&self) -> Result<()> {
        let tx = self.tx.lock().await.take().ok_or(DbError::NoTransaction)?;
        tx.rollback().await?;
        info!(dialect = %self.dialect, "Transaction rolled back");
        Ok(())
    }

    /// Returns true while a transaction is open.
    pub async fn in_transaction(&self) -> bool {
        self.tx.lock().await.is_some()
    }

    /// Runs `f` inside a transaction.
    ///
    /// The transaction is committed when `f` succeeds and rolled back when
    /// it fails; the error from `f` is returned in that case.
    ///
    /// # Errors
    ///
    /// Fails when the transaction cannot be opened or committed, or with
    /// the error returned by `f`.
    ///
    /// ```no_run
    /// # async fn run(db: &sqlb_sqlx::Database) -> sqlb_sqlx::Result<()> {
    /// db.exec_in_transaction(|db| {
    ///     Box::pin(async move {
    ///         db.exec("INSERT INTO users (name) VALUES ('a')").await?;
    ///         db.exec("INSERT INTO users (name) VALUES ('b')").await?;
    ///         Ok(())
    ///     })
    /// })
    /// .await
    /// # }
    /// ```
    pub async fn exec_in_transaction<F, T>(&self, f: F) -> Result<T>
    where
        F: for<'a> FnOnce(&'a Self) -> BoxFuture<'a, Result<T>> + Send,
        T: Send,
    {
        self.begin_transaction().await?;
        match f(self).await {
            Ok(value) => {
                self.commit_transaction().await?;
                Ok(value)
            }
            Err(e) => {
                warn!(error = %e, "Transaction failed, rolling back");
                if let Err(rollback) = self.rollback_transaction().await {
                    error!(error = %rollback, "Rollback failed");
                }
                Err(e)
            }
        }
    }

    /// Closes every connection in the pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Returns a copy of the logged statements, oldest first.
    #[must_use]
    pub fn sql_log(&self) -> Vec<SqlLogEntry> {
        self.log().entries().to_vec()
    }

    /// Returns the number of logged statements.
    #[must_use]
    pub fn sql_log_len(&self) -> usize {
        self.log().len()
    }

    /// Clears the SQL log.
    pub fn sql_log_empty(&self) {
        self.log().clear();
    }

    /// Keeps only the `leave_last` most recent statements.
    pub fn sql_log_shrink(&self, leave_last: usize) {
        self.log().shrink(leave_last);
    }

    /// Turns statement recording on or off.
    pub fn sql_log_enable(&self, enabled: bool) {
        self.sql_log_enabled.store(enabled, Ordering::Relaxed);
    }

    /// Logs every statement at info level when enabled.
    pub fn debug_enable(&self, enabled: bool) {
        self.debug.store(enabled, Ordering::Relaxed);
    }

    fn log(&self) -> MutexGuard<'_, SqlLog> {
        self.sql_log.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn trace(&self, sql: &str) {
        if self.debug.load(Ordering::Relaxed) {
            info!(sql = %sql, "Executing SQL");
        } else {
            debug!(sql = %sql, "Executing SQL");
        }
    }

    fn record(&self, sql: &str, started: Instant, executed_at: chrono::DateTime<Utc>) {
        if self.sql_log_enabled.load(Ordering::Relaxed) {
            self.log().push(SqlLogEntry {
                sql: sql.to_string(),
                duration: started.elapsed(),
                executed_at,
            });
        }
    }
}

fn cell_to_string(row: &AnyRow, index: usize) -> Result<String> {
    if let Ok(value) = row.try_get::<Option<String>, _>(index) {
        return Ok(value.unwrap_or_default());
    }
    if let Ok(value) = row.try_get::<Option<i64>, _>(index) {
        return Ok(display_or_empty(value));
    }
    if let Ok(value) = row.try_get::<Option<i32>, _>(index) {
        return Ok(display_or_empty(value));
    }
    if let Ok(value) = row.try_get::<Option<f64>, _>(index) {
        return Ok(display_or_empty(value));
    }
    if let Ok(value) = row.try_get::<Option<bool>, _>(index) {
        return Ok(display_or_empty(value));
    }
    let bytes = row.try_get::<Option<Vec<u8>>, _>(index)?;
    Ok(bytes.map_or_else(String::new, |b| String::from_utf8_lossy(&b).into_owned()))
}

fn display_or_empty<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(String::new, |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_db() -> Database {
        let config = DatabaseConfig::default().sql_log(true);
        Database::connect(&config).await.unwrap()
    }

    #[tokio::test]
    async fn test_dialect_helpers() {
        let db = memory_db().await;
        assert!(db.is_sqlite());
        assert!(!db.is_mysql());
        assert!(!db.is_postgres());
        assert!(!db.is_mssql());
        assert_eq!(db.builder().dialect(), Dialect::Sqlite);
    }

    #[tokio::test]
    async fn test_sql_log_records_statements() {
        let db = memory_db().await;
        db.exec("CREATE TABLE t (id INTEGER)").await.unwrap();
        db.exec("INSERT INTO t (id) VALUES (1)").await.unwrap();
        db.exec("INSERT INTO t (id) VALUES (2)").await.unwrap();
        assert_eq!(db.sql_log_len(), 3);
        assert_eq!(db.sql_log()[0].sql, "CREATE TABLE t (id INTEGER)");

        db.sql_log_shrink(1);
        assert_eq!(db.sql_log_len(), 1);
        assert_eq!(db.sql_log()[0].sql, "INSERT INTO t (id) VALUES (2)");

        db.sql_log_empty();
        assert_eq!(db.sql_log_len(), 0);

        db.sql_log_enable(false);
        db.exec("DELETE FROM t").await.unwrap();
        assert_eq!(db.sql_log_len(), 0);
    }

    #[tokio::test]
    async fn test_transaction_state_errors() {
        let db = memory_db().await;
        assert!(matches!(
            db.commit_transaction().await,
            Err(DbError::NoTransaction)
        ));
        assert!(matches!(
            db.rollback_transaction().await,
            Err(DbError::NoTransaction)
        ));

        db.begin_transaction().await.unwrap();
        assert!(db.in_transaction().await);
        let err = db.begin_transaction().await.unwrap_err();
        assert_eq!(err.to_string(), "transaction already in progress");
        db.commit_transaction().await.unwrap();
        assert!(!db.in_transaction().await);
    }

    #[tokio::test]
    async fn test_select_to_map_string_converts_cells() {
        let db = memory_db().await;
        let rows = db
            .select_to_map_string("SELECT 'a' AS s, 42 AS i, 1.5 AS f, NULL AS n", &[])
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["s"], "a");
        assert_eq!(rows[0]["i"], "42");
        assert_eq!(rows[0]["f"], "1.5");
        assert_eq!(rows[0]["n"], "");
    }
}
