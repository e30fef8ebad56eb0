//! Settings domain types and validation.
//!
//! Pure domain types with no infrastructure dependencies; the CLI owns
//! persistence (a JSON file next to the output directory).

use serde::{Deserialize, Serialize};

/// Default word limit per chunk.
pub const DEFAULT_WORD_LIMIT: usize = 3500;

/// Default synthesis worker pool size.
pub const DEFAULT_MAX_WORKERS: usize = 4;

/// Default number of synthesis attempts per chunk.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default base delay for exponential backoff, in milliseconds.
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 2000;

/// Default background music gain.
pub const DEFAULT_BGM_VOLUME: f32 = 0.2;

/// Run settings for the narration pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Voice identifier for synthesis requests.
    pub voice_id: String,
    /// Speaking rate offset in percent (formatted as `"+N%"` on the wire).
    pub rate_percent: i32,
    /// Pitch offset in Hz (formatted as `"+NHz"` on the wire).
    pub pitch_hz: i32,
    /// Voice gain applied at mix time.
    pub volume: f32,
    /// Maximum words per chunk.
    pub word_limit: usize,
    /// Synthesis worker pool size.
    pub max_workers: usize,
    /// Synthesis attempts per chunk before the run aborts.
    pub max_attempts: u32,
    /// Base delay for exponential backoff between attempts.
    pub retry_base_delay_ms: u64,
    /// Background music gain.
    pub bgm_volume: f32,
    /// Base directory for narration output, when configured.
    pub output_dir: Option<String>,
    /// Audio cache directory, when configured (defaults to `.cache`).
    pub cache_dir: Option<String>,
}

impl Settings {
    /// Create settings with sensible defaults.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            voice_id: "en-US-JennyNeural".to_string(),
            rate_percent: 0,
            pitch_hz: 0,
            volume: 1.0,
            word_limit: DEFAULT_WORD_LIMIT,
            max_workers: DEFAULT_MAX_WORKERS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_base_delay_ms: DEFAULT_RETRY_BASE_DELAY_MS,
            bgm_volume: DEFAULT_BGM_VOLUME,
            output_dir: None,
            cache_dir: None,
        }
    }

    /// Validate field ranges.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.word_limit == 0 {
            return Err(SettingsError::InvalidWordLimit(self.word_limit));
        }
        if self.max_workers == 0 || self.max_workers > 64 {
            return Err(SettingsError::InvalidWorkerCount(self.max_workers));
        }
        if self.max_attempts == 0 {
            return Err(SettingsError::InvalidAttempts(self.max_attempts));
        }
        if !(self.volume > 0.0 && self.volume <= 4.0) {
            return Err(SettingsError::InvalidGain(self.volume));
        }
        if !(self.bgm_volume > 0.0 && self.bgm_volume <= 4.0) {
            return Err(SettingsError::InvalidGain(self.bgm_volume));
        }
        Ok(())
    }

    /// Build the wire-format voice settings from these values.
    #[must_use]
    pub fn voice_settings(&self) -> crate::domain::VoiceSettings {
        crate::domain::VoiceSettings::new(self.voice_id.clone())
            .with_rate_percent(self.rate_percent)
            .with_pitch_hz(self.pitch_hz)
            .with_volume(self.volume)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Settings validation error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SettingsError {
    #[error("Word limit must be at least 1, got {0}")]
    InvalidWordLimit(usize),

    #[error("Worker count must be between 1 and 64, got {0}")]
    InvalidWorkerCount(usize),

    #[error("Attempt count must be at least 1, got {0}")]
    InvalidAttempts(u32),

    #[error("Gain must be in (0.0, 4.0], got {0}")]
    InvalidGain(f32),
}
