//! # Larder
//!
//! Inventory ledger for physical stock, keyed by content-derived identity:
//! - Identity derivation from (product name, brand name)
//! - Insert-or-merge receipt protocol with per-batch provenance
//! - Secondary-index-backed range queries over the product name
//! - Ingestion adapter with a pluggable recognition oracle
//! - JSON seed provisioning for products, orders, and locations
//!
//! Repeated receipts of the same (product, brand) pair merge into one
//! logical record; each delivery stays visible as a batch for expiry
//! tracking and auditing. The aggregate quantity of a record always equals
//! the sum of its batches, including under concurrent receipts on the same
//! identity.
//!
//! The store handle has an explicit lifecycle: open a pool once with
//! [`db::init_database`], pass it to [`Ledger`] and [`SecondaryIndex`], and
//! close it at shutdown.
//!
//! ```no_run
//! use larder::{db, Ledger, Receipt};
//!
//! # async fn run() -> larder::Result<()> {
//! let pool = db::init_database(std::path::Path::new("inventory.db")).await?;
//! let ledger = Ledger::new(pool.clone());
//!
//! let receipt = Receipt::new(
//!     "Juice",
//!     "Boost",
//!     1,
//!     chrono::NaiveDate::from_ymd_opt(2024, 11, 21).unwrap(),
//!     chrono::NaiveDate::from_ymd_opt(2026, 11, 21).unwrap(),
//! )?;
//! let product = ledger.receive(&receipt).await?;
//! assert_eq!(product.total_quantity, 1);
//!
//! pool.close().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod identity;
pub mod index;
pub mod ingest;
pub mod ledger;

pub use error::{Error, Result};
pub use identity::ProductIdentity;
pub use index::{IndexedField, SecondaryIndex};
pub use ingest::{IngestReport, ProductRecognizer, Receipt, Recognition, RecognitionError};
pub use ledger::Ledger;
