//! Filesystem audio cache keyed by content hash.
//!
//! Entries are named `<sha256>.mp3` where the hash covers the exact
//! inputs that determine an artifact's content: chunk text, voice, rate
//! and pitch. Mix-time gain is excluded - cached artifacts are
//! volume-independent.
//!
//! Known gap, kept deliberately: the store has no eviction policy and no
//! checksum of its own content, so it grows without bound and a hash
//! collision or a torn copy outside the atomic-persist path would be
//! trusted silently.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tracing::debug;

use lector_core::domain::VoiceSettings;
use lector_core::ports::{AudioCachePort, CacheError};

/// Content-addressable store for synthesized chunk artifacts.
#[derive(Debug, Clone)]
pub struct FsAudioCache {
    cache_dir: PathBuf,
}

impl FsAudioCache {
    /// Create a cache rooted at `cache_dir`. The directory is created
    /// lazily on first store.
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    /// The cache root directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Derive the deterministic key for a text/voice combination.
    ///
    /// Two calls with identical inputs yield the identical key; any
    /// differing field yields a different key with overwhelming
    /// probability.
    #[must_use]
    pub fn cache_key(text: &str, settings: &VoiceSettings) -> String {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        hasher.update(b"|");
        hasher.update(settings.voice_id.as_bytes());
        hasher.update(b"|");
        hasher.update(settings.rate.as_bytes());
        hasher.update(b"|");
        hasher.update(settings.pitch.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{key}.mp3"))
    }
}

#[async_trait]
impl AudioCachePort for FsAudioCache {
    async fn lookup(&self, text: &str, settings: &VoiceSettings) -> Option<PathBuf> {
        let path = self.entry_path(&Self::cache_key(text, settings));
        if tokio::fs::metadata(&path).await.is_ok() {
            Some(path)
        } else {
            None
        }
    }

    async fn store(
        &self,
        text: &str,
        settings: &VoiceSettings,
        source_path: &Path,
    ) -> Result<(), CacheError> {
        tokio::fs::create_dir_all(&self.cache_dir)
            .await
            .map_err(|e| CacheError::from_io_error(&e))?;

        let key = Self::cache_key(text, settings);
        let entry = self.entry_path(&key);

        // Produce under a temp path, then persist under the key path, so
        // a concurrent reader never observes a partially written entry.
        let tmp = tempfile::Builder::new()
            .prefix(&key)
            .suffix(".tmp")
            .tempfile_in(&self.cache_dir)
            .map_err(|e| CacheError::from_io_error(&e))?;
        std::fs::copy(source_path, tmp.path()).map_err(|e| CacheError::from_io_error(&e))?;
        tmp.persist(&entry)
            .map_err(|e| CacheError::from_io_error(&e.error))?;

        debug!(key = %key, "cached synthesis artifact");
        Ok(())
    }

    async fn clear(&self) -> Result<(), CacheError> {
        match tokio::fs::remove_dir_all(&self.cache_dir).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(CacheError::from_io_error(&e)),
        }
        tokio::fs::create_dir_all(&self.cache_dir)
            .await
            .map_err(|e| CacheError::from_io_error(&e))
    }
}
