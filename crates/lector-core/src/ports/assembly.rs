//! Audio assembly port - trait abstraction over the external encoder.
//!
//! The encoder is driven through a file-based contract: callers hand over
//! ordered artifact paths and receive a single output path. Codec and
//! container details are opaque to the pipeline.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by assembly operations.
#[derive(Debug, Error)]
pub enum AssemblyError {
    /// The external encoder binary could not be found.
    #[error("Encoder not found: {hint}")]
    ToolMissing {
        /// Remediation hint for the operator.
        hint: String,
    },

    /// The encoder exited with a failure status.
    #[error("Encoder failed (status {status}): {stderr}")]
    CommandFailed {
        /// Exit status, or `"signal"` when terminated without one.
        status: String,
        /// Captured stderr tail.
        stderr: String,
    },

    /// No input artifacts were supplied to a merge.
    #[error("Nothing to merge: empty input list")]
    NoInput,

    /// Local I/O failed (list file, output placement).
    #[error("I/O error: {0}")]
    Io(String),
}

impl AssemblyError {
    /// Create an I/O error from a `std::io::Error`.
    #[must_use]
    pub fn from_io_error(err: &std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Port for merging and mixing audio artifacts.
///
/// # Contract
///
/// - `merge` concatenates in the *given* order and re-encodes rather than
///   stream-copying: naive stream concatenation across heterogeneously
///   encoded segments produces inconsistent duration metadata.
/// - `mix` with a background track loops the track indefinitely and
///   bounds the output duration to the voice track (shorter-wins); gains
///   are independent linear multipliers applied before summation. Without
///   a background track the voice is re-encoded alone at `voice_gain`.
#[async_trait]
pub trait AudioAssemblyPort: Send + Sync {
    /// Concatenate `inputs` in order into `output`, re-encoding.
    async fn merge(&self, inputs: &[PathBuf], output: &Path) -> Result<PathBuf, AssemblyError>;

    /// Mix the voice track with an optional looped background track.
    async fn mix(
        &self,
        voice: &Path,
        bgm: Option<&Path>,
        output: &Path,
        voice_gain: f32,
        bgm_gain: f32,
    ) -> Result<PathBuf, AssemblyError>;

    /// Re-encode an arbitrary audio file to MP3, returning the new path.
    /// An input that is already MP3 is returned unchanged.
    async fn convert_to_mp3(&self, input: &Path) -> Result<PathBuf, AssemblyError>;

    /// Generate `duration_secs` of silence at `output`.
    async fn silence(&self, duration_secs: f64, output: &Path) -> Result<PathBuf, AssemblyError>;
}
