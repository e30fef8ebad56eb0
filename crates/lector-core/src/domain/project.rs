//! Project state for a single narration run.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::VoiceSettings;

/// A bounded unit of source text scheduled for one synthesis call.
///
/// `index` is 1-based and is the sole ordering key for reassembly.
/// Completion order must never be used to order artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// 1-based position of this chunk in the source text.
    pub index: usize,
    /// The chunk text sent to the speech service.
    pub text: String,
    /// Where the synthesized artifact for this chunk is written.
    pub target_path: PathBuf,
}

/// All state owned by one narration run.
///
/// Ephemeral members (`chunks`, `generated_files`) exist only for the
/// duration of the run; cleanup removes every per-chunk artifact and the
/// merged intermediate on every exit path. Only `final_path` survives a
/// successful run.
#[derive(Debug, Clone)]
pub struct AudioProject {
    /// The document this narration was produced from.
    pub source_path: PathBuf,
    /// Directory holding per-chunk artifacts and the final output.
    pub output_dir: PathBuf,
    /// Stem used for all artifact names in `output_dir`.
    pub base_name: String,
    /// Voice parameters for every synthesis call in this run.
    pub voice_settings: VoiceSettings,
    /// Ordered chunk plan, filled by the orchestrator.
    pub chunks: Vec<Chunk>,
    /// Per-chunk artifact paths, one per chunk once synthesis completes.
    pub generated_files: Vec<PathBuf>,
    /// The surviving artifact of a successful run.
    pub final_path: Option<PathBuf>,
    /// Optional background music track to mix under the narration.
    pub bgm_path: Option<PathBuf>,
    /// Linear gain for the background track (voice gain lives in
    /// [`VoiceSettings::volume`]).
    pub bgm_volume: f32,
}

impl AudioProject {
    /// Create a project for `source_path`, deriving `base_name` from the
    /// source file stem.
    pub fn new(
        source_path: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        voice_settings: VoiceSettings,
    ) -> Self {
        let source_path = source_path.into();
        let base_name = source_path
            .file_stem()
            .map_or_else(|| "narration".to_string(), |s| s.to_string_lossy().into_owned());
        Self {
            source_path,
            output_dir: output_dir.into(),
            base_name,
            voice_settings,
            chunks: Vec::new(),
            generated_files: Vec::new(),
            final_path: None,
            bgm_path: None,
            bgm_volume: 0.2,
        }
    }

    /// Attach a background music track at the given gain.
    #[must_use]
    pub fn with_bgm(mut self, bgm_path: Option<PathBuf>, bgm_volume: f32) -> Self {
        self.bgm_path = bgm_path;
        self.bgm_volume = bgm_volume;
        self
    }

    /// Artifact path for the 1-based chunk `index`.
    pub fn part_path(&self, index: usize) -> PathBuf {
        self.output_dir
            .join(format!("{}_part_{index:03}.mp3", self.base_name))
    }

    /// Path of the merged-but-unmixed intermediate.
    pub fn merged_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}_temp_merged.mp3", self.base_name))
    }

    /// Path of the final mixed artifact.
    pub fn mixed_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}_mixed.mp3", self.base_name))
    }

    /// Whether `name` matches this project's per-chunk artifact naming.
    ///
    /// Used by the pre-run sweep to discard stale partials left by a
    /// previous failed run.
    pub fn is_part_file(&self, name: &str) -> bool {
        name.starts_with(&format!("{}_part_", self.base_name)) && name.ends_with(".mp3")
    }

    /// File name of the source document, for display.
    pub fn source_name(&self) -> String {
        self.source_path
            .file_name()
            .map_or_else(String::new, |n| n.to_string_lossy().into_owned())
    }
}
