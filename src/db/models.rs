//! Record types stored by the ledger
//!
//! JSON field names follow the persisted document shape:
//! `{ identity, productName, brandName, totalQuantity, batches: [..] }`.

use crate::identity::ProductIdentity;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

/// One discrete receipt event retained inside a product record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    pub quantity: i64,
    pub purchase_time: NaiveDate,
    pub expiration_time: NaiveDate,
}

/// Product record: the aggregate quantity plus the batches behind it.
///
/// `batches` is append-only and oldest-first under normal operation; the
/// record is destroyed only by explicit deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub identity: ProductIdentity,
    pub product_name: String,
    pub brand_name: String,
    pub total_quantity: i64,
    pub batches: Vec<Batch>,
}

impl Product {
    /// True when the aggregate equals the sum of the live batches.
    /// `receive` preserves this; `overwrite` may break it on purpose.
    pub fn is_consistent(&self) -> bool {
        self.total_quantity == self.batches.iter().map(|b| b.quantity).sum::<i64>()
    }
}

impl<'r> FromRow<'r, SqliteRow> for Product {
    fn from_row(row: &'r SqliteRow) -> std::result::Result<Self, sqlx::Error> {
        let identity_str: String = row.try_get("identity")?;
        let identity =
            ProductIdentity::try_from(identity_str).map_err(|e| sqlx::Error::ColumnDecode {
                index: "identity".into(),
                source: Box::new(e),
            })?;

        let batches_json: String = row.try_get("batches")?;
        let batches: Vec<Batch> =
            serde_json::from_str(&batches_json).map_err(|e| sqlx::Error::ColumnDecode {
                index: "batches".into(),
                source: Box::new(e),
            })?;

        Ok(Self {
            identity,
            product_name: row.try_get("product_name")?,
            brand_name: row.try_get("brand_name")?,
            total_quantity: row.try_get("total_quantity")?,
            batches,
        })
    }
}

/// Reference record for a provisioning order. Back-references a product via
/// `identity`; the ledger never mutates orders and enforces no referential
/// integrity against the products collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: String,
    pub order_date: NaiveDateTime,
    pub identity: ProductIdentity,
    pub quantity: i64,
    pub status: String,
}

/// Independent warehouse reference record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub warehouse_id: String,
    pub name: String,
    pub address: String,
    pub capacity: i64,
}
