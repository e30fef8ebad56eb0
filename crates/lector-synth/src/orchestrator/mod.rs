//! The synthesis orchestrator - scheduling core of the pipeline.
//!
//! # Design Principles
//!
//! - The task plan is immutable once built; workers receive value-type
//!   jobs and cloned Arc dependencies, never orchestrator state.
//! - Task *execution* order is unconstrained; *reassembly* order is
//!   always chunk index order, enforced by an explicit sort before merge.
//! - The collector loop does all completion accounting and pushes
//!   events into one channel; a single dispatcher task delivers them to
//!   the sink, serialized.
//! - A fatal chunk failure aborts the run: the run token stops queued
//!   tasks before they start remote work, in-flight attempts finish.
//! - Cleanup of per-chunk and merged intermediates runs on every exit
//!   path. A cancelled run returns `Ok(None)`, never an error.

mod progress;
mod worker;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use lector_core::domain::{AudioProject, Chunk, VoiceSettings};
use lector_core::errors::PipelineError;
use lector_core::events::SynthesisEvent;
use lector_core::ports::{
    AudioAssemblyPort, AudioCachePort, SpeechError, SpeechSynthesizerPort, SynthesisEventSink,
};
use lector_core::settings::{DEFAULT_MAX_WORKERS, DEFAULT_WORD_LIMIT, Settings};
use lector_core::text;

use crate::retry::{RetryPolicy, RetryingSpeechClient};

use self::progress::{ProgressTracker, spawn_dispatcher};
use self::worker::{ChunkJob, WorkerDeps, run_job};

/// Tuning knobs for a narration run.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Maximum words per chunk.
    pub word_limit: usize,
    /// Worker pool size.
    pub max_workers: usize,
    /// Retry behaviour for each chunk's synthesis calls.
    pub retry: RetryPolicy,
}

impl OrchestratorConfig {
    /// Defaults matching [`Settings::with_defaults`].
    #[must_use]
    pub const fn with_defaults() -> Self {
        Self {
            word_limit: DEFAULT_WORD_LIMIT,
            max_workers: DEFAULT_MAX_WORKERS,
            retry: RetryPolicy::with_defaults(),
        }
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl From<&Settings> for OrchestratorConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            word_limit: settings.word_limit,
            max_workers: settings.max_workers,
            retry: RetryPolicy {
                max_attempts: settings.max_attempts,
                base_delay: Duration::from_millis(settings.retry_base_delay_ms),
            },
        }
    }
}

/// Schedules concurrent chunk synthesis and assembles the result.
///
/// Collaborators arrive through constructor injection; the orchestrator
/// holds no global state and one instance can serve many runs.
pub struct SynthesisOrchestrator {
    speech: Arc<dyn SpeechSynthesizerPort>,
    assembly: Arc<dyn AudioAssemblyPort>,
    cache: Arc<dyn AudioCachePort>,
    config: OrchestratorConfig,
}

impl SynthesisOrchestrator {
    /// Wire an orchestrator from its collaborator ports.
    pub fn new(
        speech: Arc<dyn SpeechSynthesizerPort>,
        assembly: Arc<dyn AudioAssemblyPort>,
        cache: Arc<dyn AudioCachePort>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            speech,
            assembly,
            cache,
            config,
        }
    }

    /// Narrate `text` into the project's final artifact.
    ///
    /// Returns `Ok(Some(path))` on success and `Ok(None)` when `cancel`
    /// was set - cancellation is an outcome, not an error. On every exit
    /// path, per-chunk artifacts and the merged intermediate are removed;
    /// only the final artifact of a successful run survives.
    pub async fn execute(
        &self,
        text: &str,
        project: &mut AudioProject,
        sink: Arc<dyn SynthesisEventSink>,
        cancel: CancellationToken,
    ) -> Result<Option<PathBuf>, PipelineError> {
        tokio::fs::create_dir_all(&project.output_dir).await?;
        self.sweep_stale_artifacts(project).await?;
        info!(source = %project.source_name(), "starting narration pipeline");

        let (events, dispatcher) = spawn_dispatcher(sink);
        let result = self.run_pipeline(text, project, &events, &cancel).await;
        self.cleanup(project, result.is_ok()).await;

        let outcome = match result {
            Ok(final_path) => {
                project.final_path = Some(final_path.clone());
                let _ = events.send(SynthesisEvent::completed(final_path.clone()));
                info!(path = %final_path.display(), "narration complete");
                Ok(Some(final_path))
            }
            Err(e) if e.is_cancellation() => {
                let _ = events.send(SynthesisEvent::Cancelled);
                info!("narration cancelled, no result produced");
                Ok(None)
            }
            Err(e) => {
                let _ = events.send(SynthesisEvent::failed(e.to_string()));
                Err(e)
            }
        };

        // Flush queued events before returning
        drop(events);
        let _ = dispatcher.await;
        outcome
    }

    /// Synthesize a short audition sample (the first 30 words) to a temp
    /// file, bypassing the project plan and the cache.
    pub async fn preview(
        &self,
        text: &str,
        settings: &VoiceSettings,
    ) -> Result<PathBuf, PipelineError> {
        let normalized = text::preprocess(text);
        let preview_text = normalized
            .split_whitespace()
            .take(30)
            .collect::<Vec<_>>()
            .join(" ");
        if preview_text.is_empty() {
            return Err(PipelineError::Segmentation);
        }

        let target = std::env::temp_dir().join("lector_preview.mp3");
        let client =
            RetryingSpeechClient::new(Arc::clone(&self.speech), self.config.retry.clone());
        client
            .synthesize(&preview_text, &target, settings, &CancellationToken::new())
            .await?;
        Ok(target)
    }

    async fn run_pipeline(
        &self,
        text: &str,
        project: &mut AudioProject,
        events: &mpsc::UnboundedSender<SynthesisEvent>,
        cancel: &CancellationToken,
    ) -> Result<PathBuf, PipelineError> {
        let normalized = text::preprocess(text);
        let chunk_texts = text::segment(&normalized, self.config.word_limit);
        if chunk_texts.is_empty() {
            return Err(PipelineError::Segmentation);
        }

        let chunks: Vec<Chunk> = chunk_texts
            .into_iter()
            .enumerate()
            .map(|(i, chunk_text)| Chunk {
                index: i + 1,
                text: chunk_text,
                target_path: project.part_path(i + 1),
            })
            .collect();
        project.generated_files = chunks.iter().map(|c| c.target_path.clone()).collect();
        project.chunks = chunks;

        let total = project.chunks.len();
        info!(chunks = total, "narration plan ready");
        let _ = events.send(SynthesisEvent::plan_ready(total));

        if cancel.is_cancelled() {
            return Err(SpeechError::Cancelled.into());
        }

        // Fatal errors cancel this child token so queued tasks stop
        // before starting remote work; external cancellation propagates
        // through it automatically.
        let run_token = cancel.child_token();
        let tracker = ProgressTracker::new(total);
        let semaphore = Arc::new(Semaphore::new(self.config.max_workers));
        let deps = WorkerDeps {
            client: Arc::new(RetryingSpeechClient::new(
                Arc::clone(&self.speech),
                self.config.retry.clone(),
            )),
            cache: Arc::clone(&self.cache),
        };

        let mut tasks = JoinSet::new();
        for chunk in &project.chunks {
            let job = ChunkJob {
                index: chunk.index,
                text: chunk.text.clone(),
                target_path: chunk.target_path.clone(),
                settings: project.voice_settings.clone(),
                cancel: run_token.clone(),
            };
            let deps = deps.clone();
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return Err(SpeechError::Cancelled);
                };
                run_job(job, &deps).await
            });
        }

        // Completion accounting happens here, in the single collector
        // loop, so progress events are inherently ordered.
        let mut fatal: Option<SpeechError> = None;
        while let Some(joined) = tasks.join_next().await {
            let result = joined
                .unwrap_or_else(|e| Err(SpeechError::service(format!("worker task failed: {e}"))));
            match result {
                Ok(_) => {
                    let _ = events.send(tracker.record_completion());
                }
                Err(SpeechError::Cancelled) => {}
                Err(e) => {
                    if fatal.is_none() {
                        warn!(error = %e, "fatal chunk failure, aborting run");
                        run_token.cancel();
                        fatal = Some(e);
                    }
                }
            }
        }

        if cancel.is_cancelled() {
            return Err(SpeechError::Cancelled.into());
        }
        if let Some(e) = fatal {
            return Err(e.into());
        }

        // Reassembly order is chunk index order, never completion order.
        let mut ordered: Vec<(usize, PathBuf)> = project
            .chunks
            .iter()
            .map(|c| (c.index, c.target_path.clone()))
            .collect();
        ordered.sort_by_key(|(index, _)| *index);
        let ordered_files: Vec<PathBuf> = ordered.into_iter().map(|(_, path)| path).collect();
        project.generated_files.clone_from(&ordered_files);

        let _ = events.send(SynthesisEvent::merging());
        let merged = self
            .assembly
            .merge(&ordered_files, &project.merged_path())
            .await?;

        let _ = events.send(SynthesisEvent::mixing());
        let bgm = project.bgm_path.as_deref().filter(|p| p.exists());
        let final_path = self
            .assembly
            .mix(
                &merged,
                bgm,
                &project.mixed_path(),
                project.voice_settings.volume,
                project.bgm_volume,
            )
            .await?;

        Ok(final_path)
    }

    /// Discard stale partial artifacts left by a previous failed run.
    async fn sweep_stale_artifacts(&self, project: &AudioProject) -> Result<(), PipelineError> {
        let mut entries = tokio::fs::read_dir(&project.output_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if project.is_part_file(name) || entry.path() == project.merged_path() {
                debug!(file = name, "removing stale artifact from previous run");
                remove_quiet(&entry.path()).await;
            }
        }
        Ok(())
    }

    /// Remove every intermediate artifact; on failure also remove any
    /// partial final output so no partial result is ever left on disk.
    async fn cleanup(&self, project: &AudioProject, success: bool) {
        for path in &project.generated_files {
            remove_quiet(path).await;
        }
        remove_quiet(&project.merged_path()).await;
        if !success {
            remove_quiet(&project.mixed_path()).await;
        }
        debug!("intermediate artifacts cleaned up");
    }
}

async fn remove_quiet(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "failed to remove artifact"),
    }
}
