//! Voice configuration value type.

use serde::{Deserialize, Serialize};

/// Immutable voice parameters for a synthesis run.
///
/// `rate` and `pitch` are signed offset strings in the wire format the
/// speech service expects (`"+10%"`, `"-2Hz"`). Equality is structural;
/// `voice_id`, `rate` and `pitch` participate in the audio cache key.
/// `volume` does not - gain is applied at mix time, so cached synthesis
/// artifacts are valid for any volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceSettings {
    /// Voice identifier understood by the speech service.
    pub voice_id: String,
    /// Speaking rate offset as a signed percent string (default `"+0%"`).
    pub rate: String,
    /// Pitch offset as a signed Hz string (default `"+0Hz"`).
    pub pitch: String,
    /// Linear voice gain applied during assembly (default 1.0).
    pub volume: f32,
}

impl VoiceSettings {
    /// Create settings for a voice with neutral rate, pitch and volume.
    pub fn new(voice_id: impl Into<String>) -> Self {
        Self {
            voice_id: voice_id.into(),
            rate: "+0%".to_string(),
            pitch: "+0Hz".to_string(),
            volume: 1.0,
        }
    }

    /// Set the rate from a signed percent value (`7` becomes `"+7%"`).
    #[must_use]
    pub fn with_rate_percent(mut self, percent: i32) -> Self {
        self.rate = format!("{percent:+}%");
        self
    }

    /// Set the pitch from a signed Hz value (`-3` becomes `"-3Hz"`).
    #[must_use]
    pub fn with_pitch_hz(mut self, hz: i32) -> Self {
        self.pitch = format!("{hz:+}Hz");
        self
    }

    /// Set the voice gain applied at mix time.
    #[must_use]
    pub const fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_neutral_offsets() {
        let v = VoiceSettings::new("en-US-JennyNeural");
        assert_eq!(v.rate, "+0%");
        assert_eq!(v.pitch, "+0Hz");
        assert!((v.volume - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn offsets_are_signed_strings() {
        let v = VoiceSettings::new("v")
            .with_rate_percent(12)
            .with_pitch_hz(-4);
        assert_eq!(v.rate, "+12%");
        assert_eq!(v.pitch, "-4Hz");

        let neutral = VoiceSettings::new("v").with_rate_percent(0).with_pitch_hz(0);
        assert_eq!(neutral.rate, "+0%");
        assert_eq!(neutral.pitch, "+0Hz");
    }

    #[test]
    fn equality_is_structural() {
        let a = VoiceSettings::new("v").with_rate_percent(5);
        let b = VoiceSettings::new("v").with_rate_percent(5);
        assert_eq!(a, b);
        assert_ne!(a, b.clone().with_pitch_hz(1));
    }
}
