//! Chunk synthesis worker.
//!
//! The worker operates on value types and cloned Arc dependencies with no
//! access to orchestrator state beyond its own job. Cancellation is
//! observed at task boundaries: before any work starts, and inside the
//! retrying client's backoff waits. An in-flight remote call is never
//! aborted mid-call.

use std::path::PathBuf;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use lector_core::domain::VoiceSettings;
use lector_core::ports::{AudioCachePort, SpeechError};

use crate::retry::RetryingSpeechClient;

/// Dependencies for the chunk worker - cloned Arc references, allowing
/// each worker to run independently of the orchestrator's state.
#[derive(Clone)]
pub(crate) struct WorkerDeps {
    /// Retry-wrapped speech client.
    pub client: Arc<RetryingSpeechClient>,
    /// Content-addressed artifact cache, consulted before remote work.
    pub cache: Arc<dyn AudioCachePort>,
}

/// A chunk synthesis job - a value type with everything the worker needs.
pub(crate) struct ChunkJob {
    /// 1-based chunk index; used only for bookkeeping, never for timing.
    pub index: usize,
    /// Chunk text to synthesize.
    pub text: String,
    /// Where the artifact must end up.
    pub target_path: PathBuf,
    /// Voice parameters for this run.
    pub settings: VoiceSettings,
    /// Run-scoped cancellation token.
    pub cancel: CancellationToken,
}

/// Run one chunk job to completion.
///
/// Consults the cache first; a hit copies the cached artifact to the
/// target and skips the remote call entirely. A fresh synthesis result
/// is stored back into the cache; a failed store is logged and ignored -
/// the artifact exists, so the narration can proceed.
pub(crate) async fn run_job(job: ChunkJob, deps: &WorkerDeps) -> Result<usize, SpeechError> {
    if job.cancel.is_cancelled() {
        return Err(SpeechError::Cancelled);
    }

    if let Some(cached) = deps.cache.lookup(&job.text, &job.settings).await {
        tokio::fs::copy(&cached, &job.target_path)
            .await
            .map_err(|e| SpeechError::from_io_error(&e))?;
        debug!(index = job.index, "chunk served from cache");
        return Ok(job.index);
    }

    deps.client
        .synthesize(&job.text, &job.target_path, &job.settings, &job.cancel)
        .await?;

    if let Err(e) = deps
        .cache
        .store(&job.text, &job.settings, &job.target_path)
        .await
    {
        warn!(index = job.index, error = %e, "failed to cache chunk artifact");
    }

    Ok(job.index)
}
