//! Ledger service: the insert-or-merge protocol and record mutations

use crate::db::models::Product;
use crate::db::products;
use crate::identity::ProductIdentity;
use crate::ingest::Receipt;
use crate::{Error, Result};
use sqlx::SqlitePool;
use tracing::{debug, info};

/// Shared-state ledger over an injected store handle.
///
/// The pool comes from [`crate::db::init_database`]: opened once at process
/// start, handed to every component, closed at shutdown. `Ledger` is cheap
/// to clone; clones share the pool.
#[derive(Clone)]
pub struct Ledger {
    db: SqlitePool,
}

impl Ledger {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Record one receipt: create a product record for an unseen
    /// (product, brand) pair, or append a batch to the existing record with
    /// the same derived identity and grow its aggregate.
    ///
    /// Always appends - identical repeat receipts are two batches, not an
    /// error. Under concurrent calls on one identity every batch lands
    /// exactly once and the aggregate ends at the sum of all submitted
    /// quantities. The returned record is read back after the merge and may
    /// already include later concurrent merges.
    pub async fn receive(&self, receipt: &Receipt) -> Result<Product> {
        let identity = ProductIdentity::derive(&receipt.product_name, &receipt.brand_name);
        let batch = receipt.batch();
        products::insert_or_merge(
            &self.db,
            &identity,
            &receipt.product_name,
            &receipt.brand_name,
            &batch,
        )
        .await?;

        debug!("Merged batch of {} into {}", batch.quantity, identity);
        self.lookup(&identity).await
    }

    /// Replace the top-level fields of the record at `identity`, creating it
    /// if absent.
    ///
    /// This is the manual-correction path: it sets the fields it is given
    /// and deliberately does not accumulate, and the batches of an existing
    /// record are left untouched. The identity is taken as given, not
    /// re-derived, so a record can be corrected even when its new names
    /// hash elsewhere.
    pub async fn overwrite(
        &self,
        identity: &ProductIdentity,
        receipt: &Receipt,
    ) -> Result<Product> {
        products::replace_top_level(
            &self.db,
            identity,
            &receipt.product_name,
            &receipt.brand_name,
            &receipt.batch(),
        )
        .await?;

        info!("Overwrote product record {}", identity);
        self.lookup(identity).await
    }

    /// Load the record at `identity`; `NotFound` when absent.
    pub async fn lookup(&self, identity: &ProductIdentity) -> Result<Product> {
        products::fetch(&self.db, identity)
            .await?
            .ok_or_else(|| Error::NotFound(format!("no product record with identity {}", identity)))
    }

    /// Lookup by the (product name, brand name) pair the identity derives
    /// from.
    pub async fn lookup_named(&self, product_name: &str, brand_name: &str) -> Result<Product> {
        self.lookup(&ProductIdentity::derive(product_name, brand_name))
            .await
    }

    /// Delete the record at `identity`.
    ///
    /// Reports `NotFound` when no such record exists, so deleting twice
    /// succeeds once and then keeps reporting `NotFound` - never anything
    /// worse.
    pub async fn remove(&self, identity: &ProductIdentity) -> Result<()> {
        if products::delete(&self.db, identity).await? {
            info!("Deleted product record {}", identity);
            Ok(())
        } else {
            Err(Error::NotFound(format!(
                "no product record with identity {}",
                identity
            )))
        }
    }

    /// Delete by the (product name, brand name) pair.
    pub async fn remove_named(&self, product_name: &str, brand_name: &str) -> Result<()> {
        self.remove(&ProductIdentity::derive(product_name, brand_name))
            .await
    }

    /// Full inventory listing, name-ordered.
    pub async fn all_products(&self) -> Result<Vec<Product>> {
        products::fetch_all(&self.db).await
    }
}
