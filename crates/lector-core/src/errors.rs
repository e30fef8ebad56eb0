//! Pipeline error taxonomy.
//!
//! Cancellation is deliberately absent from [`PipelineError`]: a
//! cancelled run is an explicit no-result outcome (`Ok(None)`), never an
//! error. The [`SpeechError::Cancelled`] sentinel that workers raise
//! internally is mapped by the orchestrator before it reaches callers.

use thiserror::Error;

use crate::ports::{AssemblyError, SpeechError};

/// Canonical error type for a narration run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Segmentation produced zero chunks - failed before any work
    /// started; there is nothing to clean up.
    #[error("No narratable text: segmentation produced zero chunks")]
    Segmentation,

    /// Upstream text extraction failed.
    #[error("Text extraction failed: {0}")]
    Extraction(String),

    /// A chunk failed after exhausting retries; the run was aborted and
    /// cleaned up.
    #[error(transparent)]
    Synthesis(#[from] SpeechError),

    /// Merge or mix failed after synthesis succeeded; the run was
    /// cleaned up.
    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    /// Filesystem operation on project artifacts failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// Whether this error wraps the internal cancellation sentinel.
    ///
    /// The orchestrator checks this to convert worker-level cancellation
    /// into the non-error `Ok(None)` outcome.
    #[must_use]
    pub const fn is_cancellation(&self) -> bool {
        matches!(self, Self::Synthesis(SpeechError::Cancelled))
    }
}
