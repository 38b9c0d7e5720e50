//! Database initialization
//!
//! Opens the backing store and creates the schema on first run. The returned
//! pool is the single store handle for the process: open it at startup, pass
//! it by reference to every component, close it at shutdown.

use crate::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::Path;
use tracing::info;

/// Initialize the database connection pool and create tables if needed.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL keeps readers concurrent with the single writer
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    // Schema creation is idempotent - safe to call on every startup
    create_products_table(&pool).await?;
    create_orders_table(&pool).await?;
    create_locations_table(&pool).await?;

    Ok(pool)
}

/// Create the products table
///
/// One row per logical product record. The identity column is the
/// content-derived primary key; `batches` holds the receipt history as a
/// JSON array so a merge can land in a single statement.
pub async fn create_products_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS products (
            identity TEXT PRIMARY KEY CHECK (length(identity) = 64),
            product_name TEXT NOT NULL,
            brand_name TEXT NOT NULL,
            total_quantity INTEGER NOT NULL DEFAULT 0,
            batches TEXT NOT NULL DEFAULT '[]',
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            CHECK (total_quantity >= 0),
            CHECK (json_valid(batches))
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the orders table
///
/// Read-only reference data. `identity` back-references a product record but
/// carries no FOREIGN KEY; the ledger does not enforce referential integrity
/// between orders and products.
pub async fn create_orders_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS orders (
            order_id TEXT PRIMARY KEY,
            order_date TIMESTAMP NOT NULL,
            identity TEXT NOT NULL,
            quantity INTEGER NOT NULL,
            status TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            CHECK (quantity >= 0)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the locations table
pub async fn create_locations_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS locations (
            warehouse_id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            address TEXT NOT NULL,
            capacity INTEGER NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            CHECK (capacity >= 0)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
