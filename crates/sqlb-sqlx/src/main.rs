//! sqlb CLI
//!
//! Inspect table schemas and create or drop tables from JSON column files.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use sqlb_sqlx::{
    Database, DatabaseConfig, load_columns, table_create_if_not_exists_sql, table_create_sql,
    table_drop_if_exists_sql, table_drop_sql,
};

/// Dialect-aware SQL statements for MySQL, PostgreSQL, SQLite and SQL Server.
#[derive(Parser)]
#[command(name = "sqlb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database URL; the scheme selects the dialect.
    #[arg(short, long, env = "DATABASE_URL", default_value = "sqlite:db.sqlite3")]
    database: String,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    /// Print every executed statement as JSON when done.
    #[arg(long)]
    sql_log: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the columns of a table as JSON.
    Columns {
        /// Table name.
        table: String,

        /// Keep native type names instead of mapping them to portable types.
        #[arg(long)]
        raw: bool,
    },

    /// Check whether a table has a column.
    ColumnExists {
        /// Table name.
        table: String,

        /// Column name.
        column: String,
    },

    /// Create a table from a JSON column file.
    Create {
        /// Table name.
        table: String,

        /// JSON file holding an array of column definitions.
        #[arg(short, long)]
        schema: PathBuf,

        /// Do nothing if the table already exists.
        #[arg(long)]
        if_not_exists: bool,

        /// Show SQL without executing (dry run).
        #[arg(long)]
        dry_run: bool,
    },

    /// Drop a table.
    Drop {
        /// Table name.
        table: String,

        /// Do nothing if the table does not exist.
        #[arg(long)]
        if_exists: bool,

        /// Show SQL without executing (dry run).
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = DatabaseConfig::new(&cli.database)
        .sql_log(cli.sql_log)
        .debug(cli.verbose);
    let dialect = config.resolve_dialect()?;

    // Dry runs only render, so they never connect.
    let sql = match &cli.command {
        Commands::Create {
            table,
            schema,
            if_not_exists,
            dry_run: true,
        } => {
            let columns = load_columns(schema)?;
            Some(if *if_not_exists {
                table_create_if_not_exists_sql(dialect, table, &columns)?
            } else {
                table_create_sql(dialect, table, &columns)?
            })
        }
        Commands::Drop {
            table,
            if_exists,
            dry_run: true,
        } => Some(if *if_exists {
            table_drop_if_exists_sql(dialect, table)?
        } else {
            table_drop_sql(dialect, table)?
        }),
        _ => None,
    };
    if let Some(sql) = sql {
        info!("Dry run mode - SQL will be printed but not executed.");
        println!("{sql}");
        return Ok(());
    }

    let db = Database::connect(&config).await?;

    match cli.command {
        Commands::Columns { table, raw } => {
            let columns = db.table_columns(&table, !raw).await?;
            println!("{}", serde_json::to_string_pretty(&columns)?);
        }

        Commands::ColumnExists { table, column } => {
            let exists = db.table_column_exists(&table, &column).await?;
            println!("{exists}");
        }

        Commands::Create {
            table,
            schema,
            if_not_exists,
            ..
        } => {
            let columns = load_columns(&schema)?;
            if if_not_exists {
                db.table_create_if_not_exists(&table, &columns).await?;
            } else {
                db.table_create(&table, &columns).await?;
            }
        }

        Commands::Drop {
            table, if_exists, ..
        } => {
            if if_exists {
                db.table_drop_if_exists(&table).await?;
            } else {
                db.table_drop(&table).await?;
            }
        }
    }

    if cli.sql_log {
        println!("{}", serde_json::to_string_pretty(&db.sql_log())?);
    }
    db.close().await;

    Ok(())
}
