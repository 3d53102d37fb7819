//! Database configuration module for LedgerEdge.
//!
//! Handles the `SQLite` connection and table creation using `SeaORM`. Tables are
//! generated with `Schema::create_table_from_entity`, so the `customers` and
//! `financial_records` layout (including the cascading foreign key) always matches
//! the entity definitions.

use crate::entities::{Customer, FinancialRecord};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::{debug, info, instrument};

/// Default database location when `DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/ledger.sqlite?mode=rwc";

/// Gets the database URL from environment variable or returns default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database at `database_url`.
///
/// For file-backed `SQLite` URLs the parent directory is created first.
#[instrument]
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    if let Some(path) = database_url
        .strip_prefix("sqlite://")
        .map(|rest| rest.split('?').next().unwrap_or(rest))
        .filter(|path| !path.is_empty() && !path.contains(":memory:"))
    {
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
    }

    debug!("Connecting to database");
    let db = Database::connect(database_url).await?;
    db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;
    info!("Database connection established");
    Ok(db)
}

/// Creates the `customers` and `financial_records` tables if they do not exist.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    // Parent table first so the foreign key resolves
    let mut customer_table = schema.create_table_from_entity(Customer);
    customer_table.if_not_exists();
    let mut record_table = schema.create_table_from_entity(FinancialRecord);
    record_table.if_not_exists();

    db.execute(builder.build(&customer_table)).await?;
    db.execute(builder.build(&record_table)).await?;

    debug!("Ledger tables ensured");
    Ok(())
}
