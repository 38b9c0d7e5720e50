//! Integration tests for the ingestion pipeline
//!
//! Uses a scripted stand-in for the recognition oracle: the real model is an
//! external collaborator and never part of these tests.

mod helpers;

use chrono::Duration;
use helpers::{date, temp_ledger};
use larder::ingest::{self, ProductRecognizer, Recognition, RecognitionError};
use std::future::Future;
use std::path::Path;
use tempfile::TempDir;

/// Answers by file stem; unknown stems fail like a confused model.
struct ScriptedRecognizer;

impl ProductRecognizer for ScriptedRecognizer {
    fn classify(
        &self,
        image: &Path,
    ) -> impl Future<Output = Result<Recognition, RecognitionError>> + Send {
        let stem = image
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();

        async move {
            match stem.as_str() {
                "apple-juice" => Ok(Recognition {
                    product_name: "Juice".to_string(),
                    brand_name: "Boost".to_string(),
                    quantity: 2,
                }),
                "milk-carton" => Ok(Recognition {
                    product_name: "Milk".to_string(),
                    brand_name: "Dale".to_string(),
                    quantity: 3,
                }),
                "empty-shelf" => Ok(Recognition {
                    product_name: "Rice".to_string(),
                    brand_name: "Hilltop".to_string(),
                    quantity: 0,
                }),
                _ => Err(RecognitionError::Model(format!(
                    "no idea what {} is",
                    stem
                ))),
            }
        }
    }
}

fn image_folder(names: &[&str]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for name in names {
        std::fs::write(dir.path().join(name), b"not a real image").unwrap();
    }
    dir
}

#[tokio::test]
async fn failed_recognitions_are_skipped_without_aborting_the_pass() {
    let (_db_dir, ledger) = temp_ledger().await;
    let folder = image_folder(&["apple-juice.png", "blurry.jpg", "milk-carton.jpeg"]);

    let report = ingest::ingest_folder(
        &ledger,
        &ScriptedRecognizer,
        folder.path(),
        date(2024, 11, 21),
    )
    .await
    .unwrap();

    assert_eq!(report.received, 2);
    assert_eq!(report.skipped, 1);

    // The recognizable items landed despite the failure between them
    assert_eq!(
        ledger.lookup_named("Juice", "Boost").await.unwrap().total_quantity,
        2
    );
    assert_eq!(
        ledger.lookup_named("Milk", "Dale").await.unwrap().total_quantity,
        3
    );
}

#[tokio::test]
async fn unusable_quantities_are_skipped_like_failures() {
    let (_db_dir, ledger) = temp_ledger().await;
    let folder = image_folder(&["empty-shelf.png", "apple-juice.png"]);

    let report = ingest::ingest_folder(
        &ledger,
        &ScriptedRecognizer,
        folder.path(),
        date(2024, 11, 21),
    )
    .await
    .unwrap();

    assert_eq!(report.received, 1);
    assert_eq!(report.skipped, 1);
    assert!(ledger.lookup_named("Rice", "Hilltop").await.is_err());
}

#[tokio::test]
async fn recognized_items_get_the_default_shelf_life() {
    let (_db_dir, ledger) = temp_ledger().await;
    let folder = image_folder(&["apple-juice.png"]);
    let today = date(2024, 11, 21);

    ingest::ingest_folder(&ledger, &ScriptedRecognizer, folder.path(), today)
        .await
        .unwrap();

    let product = ledger.lookup_named("Juice", "Boost").await.unwrap();
    let batch = &product.batches[0];
    assert_eq!(batch.purchase_time, today);
    assert_eq!(
        batch.expiration_time,
        today + Duration::days(ingest::DEFAULT_SHELF_LIFE_DAYS)
    );
}

#[tokio::test]
async fn non_image_files_are_ignored_entirely() {
    let (_db_dir, ledger) = temp_ledger().await;
    let folder = image_folder(&["inventory.csv", "README.md"]);

    let report = ingest::ingest_folder(
        &ledger,
        &ScriptedRecognizer,
        folder.path(),
        date(2024, 11, 21),
    )
    .await
    .unwrap();

    assert_eq!(report.received, 0);
    assert_eq!(report.skipped, 0);
    assert!(ledger.all_products().await.unwrap().is_empty());
}

#[tokio::test]
async fn repeat_ingest_of_the_same_shelf_merges_batches() {
    let (_db_dir, ledger) = temp_ledger().await;
    let folder = image_folder(&["apple-juice.png"]);

    for _ in 0..2 {
        ingest::ingest_folder(
            &ledger,
            &ScriptedRecognizer,
            folder.path(),
            date(2024, 11, 21),
        )
        .await
        .unwrap();
    }

    let product = ledger.lookup_named("Juice", "Boost").await.unwrap();
    assert_eq!(product.total_quantity, 4);
    assert_eq!(product.batches.len(), 2);
}
