//! Product store operations
//!
//! Every mutation here is a single SQL statement, so a merge can never be
//! observed half-applied: the batch append and the aggregate increment land
//! together or not at all.

use crate::db::models::{Batch, Product};
use crate::identity::ProductIdentity;
use crate::{Error, Result};
use futures::stream::BoxStream;
use futures::StreamExt;
use sqlx::SqlitePool;

const PRODUCT_COLUMNS: &str = "identity, product_name, brand_name, total_quantity, batches";

/// Insert a new product record, or merge a batch into the existing record
/// with the same identity.
///
/// The conflict arm appends the batch and increments the aggregate against
/// the matched row in the same statement. There is no read-modify-write
/// window: concurrent merges on one identity serialize in the store and none
/// is lost or duplicated.
pub async fn insert_or_merge(
    pool: &SqlitePool,
    identity: &ProductIdentity,
    product_name: &str,
    brand_name: &str,
    batch: &Batch,
) -> Result<()> {
    let initial_batches = serde_json::to_string(std::slice::from_ref(batch))?;
    let appended_batch = serde_json::to_string(batch)?;

    sqlx::query(
        r#"
        INSERT INTO products (identity, product_name, brand_name, total_quantity, batches, created_at, updated_at)
        VALUES (?, ?, ?, ?, json(?), CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
        ON CONFLICT(identity) DO UPDATE SET
            total_quantity = total_quantity + excluded.total_quantity,
            batches = json_insert(batches, '$[#]', json(?)),
            updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(identity.as_str())
    .bind(product_name)
    .bind(brand_name)
    .bind(batch.quantity)
    .bind(initial_batches)
    .bind(appended_batch)
    .execute(pool)
    .await?;

    Ok(())
}

/// Replace the top-level fields of a product record, creating it if absent.
///
/// The batches of an existing record are left untouched. A newly created
/// record gets the submitted batch as its only provenance entry, so it
/// starts with the aggregate matching the batch sum.
pub async fn replace_top_level(
    pool: &SqlitePool,
    identity: &ProductIdentity,
    product_name: &str,
    brand_name: &str,
    batch: &Batch,
) -> Result<()> {
    let initial_batches = serde_json::to_string(std::slice::from_ref(batch))?;

    sqlx::query(
        r#"
        INSERT INTO products (identity, product_name, brand_name, total_quantity, batches, created_at, updated_at)
        VALUES (?, ?, ?, ?, json(?), CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
        ON CONFLICT(identity) DO UPDATE SET
            product_name = excluded.product_name,
            brand_name = excluded.brand_name,
            total_quantity = excluded.total_quantity,
            updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(identity.as_str())
    .bind(product_name)
    .bind(brand_name)
    .bind(batch.quantity)
    .bind(initial_batches)
    .execute(pool)
    .await?;

    Ok(())
}

/// Insert a complete record as-is, replacing any existing record with the
/// same identity. Used by seed provisioning only.
pub async fn insert_full(pool: &SqlitePool, product: &Product) -> Result<()> {
    let batches = serde_json::to_string(&product.batches)?;

    sqlx::query(
        r#"
        INSERT INTO products (identity, product_name, brand_name, total_quantity, batches, created_at, updated_at)
        VALUES (?, ?, ?, ?, json(?), CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
        ON CONFLICT(identity) DO UPDATE SET
            product_name = excluded.product_name,
            brand_name = excluded.brand_name,
            total_quantity = excluded.total_quantity,
            batches = excluded.batches,
            updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(product.identity.as_str())
    .bind(&product.product_name)
    .bind(&product.brand_name)
    .bind(product.total_quantity)
    .bind(batches)
    .execute(pool)
    .await?;

    Ok(())
}

/// Load a product record by identity.
pub async fn fetch(pool: &SqlitePool, identity: &ProductIdentity) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(&format!(
        "SELECT {} FROM products WHERE identity = ?",
        PRODUCT_COLUMNS
    ))
    .bind(identity.as_str())
    .fetch_optional(pool)
    .await?;

    Ok(product)
}

/// Delete a product record by identity. Returns whether a record existed.
pub async fn delete(pool: &SqlitePool, identity: &ProductIdentity) -> Result<bool> {
    let result = sqlx::query("DELETE FROM products WHERE identity = ?")
        .bind(identity.as_str())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Load all product records, name-ordered.
pub async fn fetch_all(pool: &SqlitePool) -> Result<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(&format!(
        "SELECT {} FROM products ORDER BY product_name, brand_name",
        PRODUCT_COLUMNS
    ))
    .fetch_all(pool)
    .await?;

    Ok(products)
}

/// Every record whose product name matches, as a lazy row stream.
pub fn stream_by_product_name<'a>(
    pool: &'a SqlitePool,
    product_name: &'a str,
) -> BoxStream<'a, Result<Product>> {
    sqlx::query_as::<_, Product>(
        "SELECT identity, product_name, brand_name, total_quantity, batches \
         FROM products WHERE product_name = ? ORDER BY brand_name",
    )
    .bind(product_name)
    .fetch(pool)
    .map(|row| row.map_err(Error::from))
    .boxed()
}

/// Number of records whose product name matches.
pub async fn count_by_product_name(pool: &SqlitePool, product_name: &str) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE product_name = ?")
        .bind(product_name)
        .fetch_one(pool)
        .await?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");
        crate::db::init::create_products_table(&pool).await.unwrap();
        pool
    }

    fn batch(quantity: i64) -> Batch {
        Batch {
            quantity,
            purchase_time: NaiveDate::from_ymd_opt(2024, 11, 21).unwrap(),
            expiration_time: NaiveDate::from_ymd_opt(2026, 11, 21).unwrap(),
        }
    }

    #[tokio::test]
    async fn merge_creates_then_accumulates() {
        let pool = test_pool().await;
        let identity = ProductIdentity::derive("Juice", "Boost");

        insert_or_merge(&pool, &identity, "Juice", "Boost", &batch(1))
            .await
            .unwrap();
        insert_or_merge(&pool, &identity, "Juice", "Boost", &batch(10))
            .await
            .unwrap();

        let product = fetch(&pool, &identity).await.unwrap().unwrap();
        assert_eq!(product.total_quantity, 11);
        assert_eq!(product.batches.len(), 2);
        assert_eq!(product.batches[0].quantity, 1);
        assert_eq!(product.batches[1].quantity, 10);
        assert!(product.is_consistent());
    }

    #[tokio::test]
    async fn replace_does_not_touch_batches() {
        let pool = test_pool().await;
        let identity = ProductIdentity::derive("Juice", "Boost");

        insert_or_merge(&pool, &identity, "Juice", "Boost", &batch(1))
            .await
            .unwrap();
        replace_top_level(&pool, &identity, "Juice", "Boost", &batch(25))
            .await
            .unwrap();

        let product = fetch(&pool, &identity).await.unwrap().unwrap();
        assert_eq!(product.total_quantity, 25);
        assert_eq!(product.batches.len(), 1);
        assert_eq!(product.batches[0].quantity, 1);
    }

    #[tokio::test]
    async fn delete_reports_absence() {
        let pool = test_pool().await;
        let identity = ProductIdentity::derive("Juice", "Boost");

        insert_or_merge(&pool, &identity, "Juice", "Boost", &batch(1))
            .await
            .unwrap();

        assert!(delete(&pool, &identity).await.unwrap());
        assert!(!delete(&pool, &identity).await.unwrap());
        assert!(fetch(&pool, &identity).await.unwrap().is_none());
    }
}
