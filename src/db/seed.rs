//! JSON seed provisioning
//!
//! Loads a typed seed document and populates the products, orders, and
//! locations collections. Every product record is validated before anything
//! is written: the identity must match the derivation from its names and the
//! aggregate must match the batch sum.

use crate::db::models::{Location, Order, Product};
use crate::db::{products, reference};
use crate::identity::ProductIdentity;
use crate::{Error, Result};
use serde::Deserialize;
use sqlx::SqlitePool;
use std::path::Path;
use tracing::info;

/// Top-level shape of a seed file. Absent collections default to empty.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeedDocument {
    pub products: Vec<Product>,
    pub orders: Vec<Order>,
    pub locations: Vec<Location>,
}

/// Counts of records written by one provisioning pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedReport {
    pub products: usize,
    pub orders: usize,
    pub locations: usize,
}

/// Read a seed document from `path` and load it into the store.
pub async fn seed_from_file(pool: &SqlitePool, path: &Path) -> Result<SeedReport> {
    let content = tokio::fs::read_to_string(path).await?;
    let document: SeedDocument = serde_json::from_str(&content)?;
    seed(pool, &document).await
}

/// Load a seed document into the store. Validation runs over the whole
/// document first, so a bad record rejects the document before any write.
pub async fn seed(pool: &SqlitePool, document: &SeedDocument) -> Result<SeedReport> {
    for product in &document.products {
        validate_product(product)?;
    }

    for product in &document.products {
        products::insert_full(pool, product).await?;
    }
    for order in &document.orders {
        reference::insert_order(pool, order).await?;
    }
    for location in &document.locations {
        reference::insert_location(pool, location).await?;
    }

    let report = SeedReport {
        products: document.products.len(),
        orders: document.orders.len(),
        locations: document.locations.len(),
    };
    info!(
        "Seeded {} products, {} orders, {} locations",
        report.products, report.orders, report.locations
    );
    Ok(report)
}

fn validate_product(product: &Product) -> Result<()> {
    let expected = ProductIdentity::derive(&product.product_name, &product.brand_name);
    if product.identity != expected {
        return Err(Error::InvalidInput(format!(
            "seed record for {}/{} carries identity {} but its names derive to {}",
            product.product_name, product.brand_name, product.identity, expected
        )));
    }

    if product.batches.is_empty() {
        return Err(Error::InvalidInput(format!(
            "seed record {} has no batches",
            product.identity
        )));
    }

    if !product.is_consistent() {
        return Err(Error::InvalidInput(format!(
            "seed record {} claims total quantity {} but its batches sum differently",
            product.identity, product.total_quantity
        )));
    }

    Ok(())
}
