//! Settings file loading.
//!
//! `settings.json` in the working directory, when present, overrides the
//! built-in defaults. Unknown or missing fields fall back gracefully so
//! old files keep working.

use std::path::Path;

use tracing::warn;

use lector_core::settings::Settings;

/// Default settings file name.
pub const SETTINGS_FILE: &str = "settings.json";

/// Load settings from `path`, falling back to defaults when the file is
/// absent or malformed.
pub fn load_from(path: &Path) -> Settings {
    match std::fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring malformed settings file");
                Settings::with_defaults()
            }
        },
        Err(_) => Settings::with_defaults(),
    }
}

/// Load settings from the default location.
#[must_use]
pub fn load() -> Settings {
    load_from(Path::new(SETTINGS_FILE))
}

/// Persist `settings` as pretty-printed JSON at `path`.
pub fn save_to(path: &Path, settings: &Settings) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Persist settings to the default location.
pub fn save(settings: &Settings) -> anyhow::Result<()> {
    save_to(Path::new(SETTINGS_FILE), settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_from(&dir.path().join("settings.json"));
        assert_eq!(settings, Settings::with_defaults());
    }

    #[test]
    fn partial_file_overrides_only_named_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"voice_id":"en-GB-RyanNeural","max_workers":2}"#).unwrap();

        let settings = load_from(&path);
        assert_eq!(settings.voice_id, "en-GB-RyanNeural");
        assert_eq!(settings.max_workers, 2);
        assert_eq!(settings.word_limit, Settings::with_defaults().word_limit);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut settings = Settings::with_defaults();
        settings.voice_id = "en-GB-RyanNeural".to_string();
        settings.max_workers = 2;

        save_to(&path, &settings).unwrap();
        assert_eq!(load_from(&path), settings);
    }

    #[test]
    fn malformed_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(load_from(&path), Settings::with_defaults());
    }
}
