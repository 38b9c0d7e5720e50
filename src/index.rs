//! Secondary index management and the range-query read path

use crate::db::models::Product;
use crate::db::products;
use crate::Result;
use futures::stream::BoxStream;
use sqlx::{Row, SqlitePool};
use tracing::info;

/// Fields of the products collection that may carry a secondary index.
///
/// Enumerated rather than a free string so an unknown field is
/// unrepresentable, not a runtime error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexedField {
    ProductName,
    BrandName,
}

impl IndexedField {
    pub fn column(self) -> &'static str {
        match self {
            IndexedField::ProductName => "product_name",
            IndexedField::BrandName => "brand_name",
        }
    }

    fn index_name(self) -> &'static str {
        match self {
            IndexedField::ProductName => "idx_products_product_name",
            IndexedField::BrandName => "idx_products_brand_name",
        }
    }
}

/// Read-side index manager over the shared store handle. Never mutates
/// product records; reads may run concurrently with ledger writes.
#[derive(Clone)]
pub struct SecondaryIndex {
    db: SqlitePool,
}

impl SecondaryIndex {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Create the index for `field` if it does not already exist. Calling
    /// this again for an indexed field is a no-op success, not an error.
    pub async fn ensure(&self, field: IndexedField) -> Result<()> {
        let statement = format!(
            "CREATE INDEX IF NOT EXISTS {} ON products({})",
            field.index_name(),
            field.column()
        );
        sqlx::query(&statement).execute(&self.db).await?;

        info!("Ensured secondary index {}", field.index_name());
        Ok(())
    }

    /// Every product record whose name matches, regardless of brand, as a
    /// lazy stream ordered by brand.
    ///
    /// Each call re-runs the query, so the sequence is restartable by
    /// calling again. No matches yields an empty stream, not an error.
    pub fn range_query<'a>(&'a self, product_name: &'a str) -> BoxStream<'a, Result<Product>> {
        products::stream_by_product_name(&self.db, product_name)
    }

    /// Number of records the range query would yield.
    pub async fn count(&self, product_name: &str) -> Result<i64> {
        products::count_by_product_name(&self.db, product_name).await
    }

    /// Names of the secondary indexes currently present on the products
    /// collection (the primary-key autoindex is not listed).
    pub async fn names(&self) -> Result<Vec<String>> {
        let rows = sqlx::query(
            "SELECT name FROM sqlite_master \
             WHERE type = 'index' AND tbl_name = 'products' \
             AND name NOT LIKE 'sqlite_autoindex_%' \
             ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(|row| row.get("name")).collect())
    }
}
