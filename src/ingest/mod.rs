//! Ingestion adapter
//!
//! Turns upstream receipt events - recognized photographs, file imports,
//! manual entries - into ledger merges. The only type the ledger accepts
//! from here is the validated [`Receipt`] tuple.

pub mod recognition;

pub use recognition::{ProductRecognizer, Recognition, RecognitionError};

use crate::db::models::Batch;
use crate::ledger::Ledger;
use crate::{Error, Result};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

/// Shelf life assumed for recognized items, since a photograph carries no
/// expiry date.
pub const DEFAULT_SHELF_LIFE_DAYS: i64 = 730;

const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// One receipt event from any upstream source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub product_name: String,
    pub brand_name: String,
    pub quantity: i64,
    pub purchase_time: NaiveDate,
    pub expiration_time: NaiveDate,
}

impl Receipt {
    /// Validate and build a receipt. Quantity must be at least 1; beyond
    /// that the core assumes well-typed inputs.
    pub fn new(
        product_name: impl Into<String>,
        brand_name: impl Into<String>,
        quantity: i64,
        purchase_time: NaiveDate,
        expiration_time: NaiveDate,
    ) -> Result<Self> {
        if quantity < 1 {
            return Err(Error::InvalidInput(format!(
                "receipt quantity must be positive, got {}",
                quantity
            )));
        }

        Ok(Self {
            product_name: product_name.into(),
            brand_name: brand_name.into(),
            quantity,
            purchase_time,
            expiration_time,
        })
    }

    pub(crate) fn batch(&self) -> Batch {
        Batch {
            quantity: self.quantity,
            purchase_time: self.purchase_time,
            expiration_time: self.expiration_time,
        }
    }
}

/// Outcome of one folder ingestion pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IngestReport {
    /// Images that produced a merged receipt
    pub received: usize,
    /// Images skipped because recognition failed or returned unusable data
    pub skipped: usize,
}

/// Collect the image files directly under `folder`, sorted for a stable
/// ingest order.
pub fn scan_images(folder: &Path) -> Result<Vec<PathBuf>> {
    let mut images = Vec::new();

    for entry in WalkDir::new(folder).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| Error::Io(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.into_path();
        let is_image = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                IMAGE_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            });
        if is_image {
            images.push(path);
        }
    }

    images.sort();
    Ok(images)
}

/// Classify every image under `folder` and feed the results through the
/// ledger.
///
/// A failed or unusable classification skips that image and the pass
/// continues; only store failures abort. Recognized items are stamped as
/// purchased on `today` with the default shelf life.
pub async fn ingest_folder<R: ProductRecognizer>(
    ledger: &Ledger,
    recognizer: &R,
    folder: &Path,
    today: NaiveDate,
) -> Result<IngestReport> {
    let purchase_time = today;
    let expiration_time = today + Duration::days(DEFAULT_SHELF_LIFE_DAYS);

    let mut report = IngestReport::default();
    for image in scan_images(folder)? {
        let recognition = match recognizer.classify(&image).await {
            Ok(recognition) => recognition,
            Err(e) => {
                warn!("Skipping {}: {}", image.display(), e);
                report.skipped += 1;
                continue;
            }
        };

        let receipt = match Receipt::new(
            recognition.product_name,
            recognition.brand_name,
            recognition.quantity,
            purchase_time,
            expiration_time,
        ) {
            Ok(receipt) => receipt,
            Err(e) => {
                warn!("Skipping {}: {}", image.display(), e);
                report.skipped += 1;
                continue;
            }
        };

        ledger.receive(&receipt).await?;
        report.received += 1;
    }

    info!(
        "Ingested {} images, skipped {}",
        report.received, report.skipped
    );
    Ok(report)
}
