//! Product recognition oracle interface
//!
//! The image-to-attribute model is an external collaborator. The ingestion
//! path consumes it through this one-method capability and depends on no
//! particular model.

use std::path::Path;
use thiserror::Error;

/// Recognition failures. Each one costs the single image it occurred on;
/// the surrounding ingest pass keeps going.
#[derive(Debug, Error)]
pub enum RecognitionError {
    /// The image could not be opened or decoded
    #[error("Unreadable image: {0}")]
    UnreadableImage(String),

    /// The model itself failed
    #[error("Model error: {0}")]
    Model(String),

    /// The model answered, but not with usable attributes
    #[error("Unusable answer: {0}")]
    UnusableAnswer(String),
}

/// Candidate attributes for one photograph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recognition {
    pub product_name: String,
    pub brand_name: String,
    pub quantity: i64,
}

/// Capability handed to the ingestion path by whoever hosts a model.
pub trait ProductRecognizer: Send + Sync {
    /// Interpret one photograph into candidate product attributes.
    fn classify(
        &self,
        image: &Path,
    ) -> impl std::future::Future<Output = std::result::Result<Recognition, RecognitionError>> + Send;
}
