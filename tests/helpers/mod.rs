//! Shared setup for integration tests
#![allow(dead_code)]

use chrono::NaiveDate;
use larder::{Ledger, Receipt};
use sqlx::SqlitePool;
use tempfile::TempDir;

/// File-backed pool in a fresh temp directory. Keep the `TempDir` alive for
/// the duration of the test.
pub async fn temp_pool() -> (TempDir, SqlitePool) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let pool = larder::db::init_database(&dir.path().join("inventory.db"))
        .await
        .expect("Failed to initialize database");
    (dir, pool)
}

/// Ledger over a fresh file-backed database.
pub async fn temp_ledger() -> (TempDir, Ledger) {
    let (dir, pool) = temp_pool().await;
    (dir, Ledger::new(pool))
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Receipt with fixed dates; tests that care about dates build their own.
pub fn receipt(product: &str, brand: &str, quantity: i64) -> Receipt {
    Receipt::new(
        product,
        brand,
        quantity,
        date(2024, 11, 21),
        date(2026, 11, 21),
    )
    .expect("valid receipt")
}
