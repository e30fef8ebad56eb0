//! Command handlers.
//!
//! Handlers own user-facing output; library crates only trace.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing::info;

use lector_core::domain::AudioProject;
use lector_core::ports::{AudioCachePort, DocumentExtractorPort};
use lector_core::settings::Settings;

use crate::bootstrap;
use crate::config_file;
use crate::extract::TextFileExtractor;
use crate::progress::IndicatifSink;

/// Arguments for the `narrate` command.
pub struct NarrateArgs {
    pub input: PathBuf,
    pub output_dir: Option<PathBuf>,
    pub voice: Option<String>,
    pub rate: Option<i32>,
    pub pitch: Option<i32>,
    pub volume: Option<f32>,
    pub bgm: Option<PathBuf>,
    pub bgm_volume: Option<f32>,
    pub workers: Option<usize>,
    pub word_limit: Option<usize>,
}

/// Fold command-line overrides into loaded settings.
pub fn apply_overrides(settings: &mut Settings, args: &NarrateArgs) {
    if let Some(voice) = &args.voice {
        settings.voice_id.clone_from(voice);
    }
    if let Some(rate) = args.rate {
        settings.rate_percent = rate;
    }
    if let Some(pitch) = args.pitch {
        settings.pitch_hz = pitch;
    }
    if let Some(volume) = args.volume {
        settings.volume = volume;
    }
    if let Some(bgm_volume) = args.bgm_volume {
        settings.bgm_volume = bgm_volume;
    }
    if let Some(workers) = args.workers {
        settings.max_workers = workers;
    }
    if let Some(word_limit) = args.word_limit {
        settings.word_limit = word_limit;
    }
    if let Some(dir) = &args.output_dir {
        settings.output_dir = Some(dir.display().to_string());
    }
}

/// Narrate a document end to end.
pub async fn narrate(mut settings: Settings, args: NarrateArgs) -> anyhow::Result<()> {
    apply_overrides(&mut settings, &args);
    let ctx = bootstrap::full_context(&settings)?;

    let (text, extraction) = TextFileExtractor::new()
        .extract_text(&args.input)
        .await
        .with_context(|| format!("could not read {}", args.input.display()))?;
    info!(method = %extraction.method, "document loaded");

    let base_dir = settings
        .output_dir
        .as_ref()
        .map_or_else(|| PathBuf::from("output"), PathBuf::from);
    let stem = args.input.file_stem().map_or_else(
        || "narration".to_string(),
        |s| s.to_string_lossy().into_owned(),
    );
    let project_dir = base_dir.join(stem);

    let mut project = AudioProject::new(&args.input, project_dir, settings.voice_settings())
        .with_bgm(args.bgm.clone(), settings.bgm_volume);

    // Ctrl-C requests a cooperative stop; in-flight chunks finish their
    // current attempt, then the run cleans up and exits without output.
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        });
    }

    let sink = Arc::new(IndicatifSink::new());
    match ctx
        .orchestrator
        .execute(&text, &mut project, sink, cancel)
        .await?
    {
        Some(path) => println!("Narration written to {}", path.display()),
        None => println!("Cancelled - no output produced."),
    }
    Ok(())
}

/// Synthesize a short audition sample from the document's opening words.
pub async fn preview(
    mut settings: Settings,
    input: PathBuf,
    voice: Option<String>,
    rate: Option<i32>,
    pitch: Option<i32>,
) -> anyhow::Result<()> {
    if let Some(voice) = voice {
        settings.voice_id = voice;
    }
    if let Some(rate) = rate {
        settings.rate_percent = rate;
    }
    if let Some(pitch) = pitch {
        settings.pitch_hz = pitch;
    }
    let ctx = bootstrap::full_context(&settings)?;

    let (text, _) = TextFileExtractor::new()
        .extract_text(&input)
        .await
        .with_context(|| format!("could not read {}", input.display()))?;

    let path = ctx
        .orchestrator
        .preview(&text, &settings.voice_settings())
        .await?;
    println!("Preview written to {}", path.display());
    Ok(())
}

/// List the voices the speech service offers.
pub async fn voices() -> anyhow::Result<()> {
    let speech = bootstrap::speech_service()?;
    let voices = speech.list_voices().await?;
    if voices.is_empty() {
        println!("No voices reported by the service.");
        return Ok(());
    }
    for voice in voices {
        println!("{:<32} {:<24} {}", voice.id, voice.name, voice.locale);
    }
    Ok(())
}

/// Remove every cached synthesis artifact.
pub async fn cache_clear(settings: &Settings) -> anyhow::Result<()> {
    bootstrap::audio_cache(settings).clear().await?;
    println!("Audio cache cleared.");
    Ok(())
}

/// Field updates for the `settings set` command.
pub struct SettingsSetArgs {
    pub voice: Option<String>,
    pub rate: Option<i32>,
    pub pitch: Option<i32>,
    pub volume: Option<f32>,
    pub bgm_volume: Option<f32>,
    pub workers: Option<usize>,
    pub word_limit: Option<usize>,
    pub output_dir: Option<String>,
    pub cache_dir: Option<String>,
}

/// Fold `settings set` updates into loaded settings.
pub fn apply_settings_updates(settings: &mut Settings, args: &SettingsSetArgs) {
    if let Some(voice) = &args.voice {
        settings.voice_id.clone_from(voice);
    }
    if let Some(rate) = args.rate {
        settings.rate_percent = rate;
    }
    if let Some(pitch) = args.pitch {
        settings.pitch_hz = pitch;
    }
    if let Some(volume) = args.volume {
        settings.volume = volume;
    }
    if let Some(bgm_volume) = args.bgm_volume {
        settings.bgm_volume = bgm_volume;
    }
    if let Some(workers) = args.workers {
        settings.max_workers = workers;
    }
    if let Some(word_limit) = args.word_limit {
        settings.word_limit = word_limit;
    }
    if let Some(dir) = &args.output_dir {
        settings.output_dir = Some(dir.clone());
    }
    if let Some(dir) = &args.cache_dir {
        settings.cache_dir = Some(dir.clone());
    }
}

/// Show all current settings.
pub fn settings_show(settings: &Settings) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(settings)?);
    Ok(())
}

/// Update settings and persist them.
pub fn settings_set(mut settings: Settings, args: &SettingsSetArgs) -> anyhow::Result<()> {
    apply_settings_updates(&mut settings, args);
    settings.validate()?;
    config_file::save(&settings)?;
    println!("Settings saved to {}", config_file::SETTINGS_FILE);
    Ok(())
}

/// Reset all settings to defaults.
pub fn settings_reset() -> anyhow::Result<()> {
    config_file::save(&Settings::with_defaults())?;
    println!("Settings reset to defaults.");
    Ok(())
}
