//! Document extraction and OCR ports.
//!
//! Extraction runs upstream of the synthesis pipeline and is consumed,
//! not implemented, by the core: the pipeline only sees the extracted
//! text. OCR is the extractor's fallback for scanned documents.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Metadata reported alongside extracted text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionInfo {
    /// Page count, when the format has pages.
    pub pages: Option<u32>,
    /// Whether extraction succeeded.
    pub success: bool,
    /// How the text was obtained (e.g. `"direct"`, `"ocr"`).
    pub method: String,
}

/// Errors surfaced by document extraction.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The document could not be read or parsed.
    #[error("Unreadable document: {0}")]
    Unreadable(String),

    /// The document contained no extractable text.
    #[error("Document contains no extractable text")]
    Empty,

    /// Local I/O failed.
    #[error("I/O error: {0}")]
    Io(String),
}

/// Port for extracting narratable text from a document.
#[async_trait]
pub trait DocumentExtractorPort: Send + Sync {
    /// Extract the document's text and report how it was obtained.
    async fn extract_text(&self, path: &Path) -> Result<(String, ExtractionInfo), ExtractionError>;
}

/// Port for optical character recognition over page images.
#[async_trait]
pub trait OcrPort: Send + Sync {
    /// Recognize text from the given page images, in order.
    async fn recognize(&self, image_paths: &[PathBuf]) -> Result<String, ExtractionError>;

    /// Whether the OCR engine is installed and usable.
    fn is_available(&self) -> bool;
}
