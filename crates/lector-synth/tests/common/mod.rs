//! Shared test doubles for the synthesis pipeline suites.

// Not every suite uses every double
#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use lector_core::domain::VoiceSettings;
use lector_core::events::SynthesisEvent;
use lector_core::ports::{
    AssemblyError, AudioAssemblyPort, SpeechError, SpeechSynthesizerPort, SynthesisEventSink,
    VoiceInfo,
};
use lector_synth::{FsAudioCache, OrchestratorConfig, RetryPolicy, SynthesisOrchestrator};

/// A speech port with scripted failures, delays and empty-artifact
/// responses, writing `[text]` as the artifact body on success.
#[derive(Default)]
pub struct ScriptedSpeechPort {
    attempts: AtomicU32,
    attempts_by_text: Mutex<HashMap<String, u32>>,
    failures: Mutex<HashMap<String, u32>>,
    empties: Mutex<HashMap<String, u32>>,
    delays: Mutex<HashMap<String, Duration>>,
    default_delay: Mutex<Duration>,
}

impl ScriptedSpeechPort {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `n` calls for `text` with an opaque service error.
    pub fn fail_times(&self, text: &str, n: u32) {
        self.failures.lock().unwrap().insert(text.to_string(), n);
    }

    /// Produce an empty artifact for the next `n` calls for `text`.
    pub fn empty_times(&self, text: &str, n: u32) {
        self.empties.lock().unwrap().insert(text.to_string(), n);
    }

    /// Delay calls for `text` by `delay` (others use the default delay).
    pub fn delay_for(&self, text: &str, delay: Duration) {
        self.delays.lock().unwrap().insert(text.to_string(), delay);
    }

    pub fn set_default_delay(&self, delay: Duration) {
        *self.default_delay.lock().unwrap() = delay;
    }

    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn attempts_for(&self, text: &str) -> u32 {
        self.attempts_by_text
            .lock()
            .unwrap()
            .get(text)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl SpeechSynthesizerPort for ScriptedSpeechPort {
    async fn synthesize(
        &self,
        text: &str,
        target_path: &Path,
        _settings: &VoiceSettings,
    ) -> Result<(), SpeechError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        *self
            .attempts_by_text
            .lock()
            .unwrap()
            .entry(text.to_string())
            .or_insert(0) += 1;

        let delay = self
            .delays
            .lock()
            .unwrap()
            .get(text)
            .copied()
            .unwrap_or_else(|| *self.default_delay.lock().unwrap());
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let should_fail = {
            let mut failures = self.failures.lock().unwrap();
            match failures.get_mut(text) {
                Some(n) if *n > 0 => {
                    *n -= 1;
                    true
                }
                _ => false,
            }
        };
        if should_fail {
            return Err(SpeechError::service("scripted failure"));
        }

        let write_empty = {
            let mut empties = self.empties.lock().unwrap();
            match empties.get_mut(text) {
                Some(n) if *n > 0 => {
                    *n -= 1;
                    true
                }
                _ => false,
            }
        };
        let body = if write_empty {
            Vec::new()
        } else {
            format!("[{text}]").into_bytes()
        };
        tokio::fs::write(target_path, body)
            .await
            .map_err(|e| SpeechError::from_io_error(&e))?;
        Ok(())
    }

    async fn list_voices(&self) -> Result<Vec<VoiceInfo>, SpeechError> {
        Ok(Vec::new())
    }
}

/// Assembly double: merge concatenates input bytes, mix copies the voice
/// track and records its arguments.
#[derive(Default)]
pub struct FakeAssembly {
    pub mix_calls: Mutex<Vec<(Option<PathBuf>, f32, f32)>>,
}

#[async_trait]
impl AudioAssemblyPort for FakeAssembly {
    async fn merge(&self, inputs: &[PathBuf], output: &Path) -> Result<PathBuf, AssemblyError> {
        if inputs.is_empty() {
            return Err(AssemblyError::NoInput);
        }
        let mut merged = Vec::new();
        for input in inputs {
            let bytes = tokio::fs::read(input)
                .await
                .map_err(|e| AssemblyError::from_io_error(&e))?;
            merged.extend_from_slice(&bytes);
        }
        tokio::fs::write(output, merged)
            .await
            .map_err(|e| AssemblyError::from_io_error(&e))?;
        Ok(output.to_path_buf())
    }

    async fn mix(
        &self,
        voice: &Path,
        bgm: Option<&Path>,
        output: &Path,
        voice_gain: f32,
        bgm_gain: f32,
    ) -> Result<PathBuf, AssemblyError> {
        self.mix_calls.lock().unwrap().push((
            bgm.map(Path::to_path_buf),
            voice_gain,
            bgm_gain,
        ));
        tokio::fs::copy(voice, output)
            .await
            .map_err(|e| AssemblyError::from_io_error(&e))?;
        Ok(output.to_path_buf())
    }

    async fn convert_to_mp3(&self, input: &Path) -> Result<PathBuf, AssemblyError> {
        Ok(input.to_path_buf())
    }

    async fn silence(&self, _duration_secs: f64, output: &Path) -> Result<PathBuf, AssemblyError> {
        tokio::fs::write(output, b"\0")
            .await
            .map_err(|e| AssemblyError::from_io_error(&e))?;
        Ok(output.to_path_buf())
    }
}

/// Sink that records every event in delivery order.
#[derive(Default)]
pub struct CollectingSink(pub Mutex<Vec<SynthesisEvent>>);

impl CollectingSink {
    /// The `completed` counts of all progress events, in delivery order.
    pub fn completion_sequence(&self) -> Vec<usize> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                SynthesisEvent::ChunkSynthesized { completed, .. } => Some(*completed),
                _ => None,
            })
            .collect()
    }
}

impl SynthesisEventSink for CollectingSink {
    fn emit(&self, event: SynthesisEvent) {
        self.0.lock().unwrap().push(event);
    }
}

/// Build an orchestrator over the doubles with a fast retry policy.
pub fn orchestrator(
    speech: Arc<ScriptedSpeechPort>,
    assembly: Arc<FakeAssembly>,
    cache_dir: &Path,
    word_limit: usize,
    max_workers: usize,
    max_attempts: u32,
) -> SynthesisOrchestrator {
    SynthesisOrchestrator::new(
        speech,
        assembly,
        Arc::new(FsAudioCache::new(cache_dir)),
        OrchestratorConfig {
            word_limit,
            max_workers,
            retry: RetryPolicy {
                max_attempts,
                base_delay: Duration::from_millis(10),
            },
        },
    )
}

/// Count files in `dir` whose name contains `needle`.
pub fn files_matching(dir: &Path, needle: &str) -> Vec<String> {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .filter(|name| name.contains(needle))
                .collect()
        })
        .unwrap_or_default()
}
