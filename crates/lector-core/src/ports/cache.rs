//! Audio cache port - content-addressable store for synthesis artifacts.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::VoiceSettings;

/// Errors surfaced by cache operations.
///
/// Lookup never errors - a broken cache entry is simply a miss.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Storage I/O failed while writing or clearing entries.
    #[error("Cache storage error: {0}")]
    Storage(String),
}

impl CacheError {
    /// Create a storage error from a `std::io::Error`.
    #[must_use]
    pub fn from_io_error(err: &std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

/// Port for the content-addressable audio cache.
///
/// The key is derived from `(text, voice_id, rate, pitch)`; identical
/// tuples yield the identical key, so concurrent writers to the same key
/// are benign - by construction they carry byte-identical content.
/// Entries are immutable once written and never evicted.
#[async_trait]
pub trait AudioCachePort: Send + Sync {
    /// Path of the cached artifact for this text/voice combination, if
    /// one exists.
    async fn lookup(&self, text: &str, settings: &VoiceSettings) -> Option<PathBuf>;

    /// Copy `source_path` into the cache under this combination's key.
    ///
    /// The write is atomic: the entry is produced under a temp path and
    /// only then placed under the final key path, so readers never see a
    /// partially written entry.
    async fn store(
        &self,
        text: &str,
        settings: &VoiceSettings,
        source_path: &Path,
    ) -> Result<(), CacheError>;

    /// Remove every cached artifact.
    async fn clear(&self) -> Result<(), CacheError>;
}
