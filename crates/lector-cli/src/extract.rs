//! Plain-text document extractor.
//!
//! PDF and OCR extraction engines stay outside this workspace; the CLI
//! narrates plain text and markdown files directly.

use std::path::Path;

use async_trait::async_trait;

use lector_core::ports::{DocumentExtractorPort, ExtractionError, ExtractionInfo};

/// Extractor for documents that already are text.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextFileExtractor;

impl TextFileExtractor {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DocumentExtractorPort for TextFileExtractor {
    async fn extract_text(&self, path: &Path) -> Result<(String, ExtractionInfo), ExtractionError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ExtractionError::Io(e.to_string()))?;
        if text.trim().is_empty() {
            return Err(ExtractionError::Empty);
        }
        let info = ExtractionInfo {
            pages: None,
            success: true,
            method: "direct".to_string(),
        };
        Ok((text, info))
    }
}
