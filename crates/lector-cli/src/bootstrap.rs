//! Composition root - the only place adapters are wired together.
//!
//! Collaborators are constructed here and injected down the call graph;
//! no process-wide mutable container exists anywhere in the workspace.

use std::sync::Arc;

use anyhow::Context;

use lector_core::ports::SpeechSynthesizerPort;
use lector_core::settings::Settings;
use lector_ffmpeg::FfmpegAssembly;
use lector_synth::{FsAudioCache, OrchestratorConfig, SynthesisOrchestrator};
use lector_tts::{HttpSpeechService, SpeechServiceConfig};

/// Default cache directory when settings configure none.
const DEFAULT_CACHE_DIR: &str = ".cache";

/// Everything a narration run needs.
pub struct AppContext {
    pub orchestrator: SynthesisOrchestrator,
}

/// Build the speech-service adapter from the environment.
pub fn speech_service() -> anyhow::Result<Arc<dyn SpeechSynthesizerPort>> {
    let config = SpeechServiceConfig::from_env().with_context(|| {
        format!(
            "speech service endpoint is not configured; set {}",
            lector_tts::ENDPOINT_ENV
        )
    })?;
    Ok(Arc::new(HttpSpeechService::new(config)))
}

/// Build the audio cache from settings.
pub fn audio_cache(settings: &Settings) -> Arc<FsAudioCache> {
    let dir = settings
        .cache_dir
        .clone()
        .unwrap_or_else(|| DEFAULT_CACHE_DIR.to_string());
    Arc::new(FsAudioCache::new(dir))
}

/// Wire the full pipeline: speech adapter, ffmpeg assembly, cache,
/// orchestrator.
pub fn full_context(settings: &Settings) -> anyhow::Result<AppContext> {
    settings.validate()?;

    let speech = speech_service()?;
    let assembly = Arc::new(FfmpegAssembly::discover()?);
    let cache = audio_cache(settings);

    let orchestrator =
        SynthesisOrchestrator::new(speech, assembly, cache, OrchestratorConfig::from(settings));
    Ok(AppContext { orchestrator })
}
