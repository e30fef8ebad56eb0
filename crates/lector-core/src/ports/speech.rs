//! Speech synthesis port - trait abstraction over the remote speech service.

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::VoiceSettings;

/// A voice offered by the speech service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceInfo {
    /// Voice identifier used in synthesis requests.
    pub id: String,
    /// Human-readable display name.
    pub name: String,
    /// Language/locale tag (e.g. `"en-US"`).
    pub locale: String,
}

/// Errors surfaced by speech synthesis.
///
/// The remote service reports failures opaquely (no structured codes), so
/// every service-side failure collapses into [`SpeechError::Service`] and
/// is treated uniformly by the retry policy.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SpeechError {
    /// The remote service failed (network, quota, server error - opaque).
    #[error("Speech service error: {0}")]
    Service(String),

    /// Local I/O failed while writing the artifact.
    #[error("I/O error: {0}")]
    Io(String),

    /// The synthesized artifact was missing or empty after the call.
    #[error("Synthesized artifact missing or empty: {path}")]
    EmptyArtifact {
        /// The expected artifact path.
        path: String,
    },

    /// All retry attempts were exhausted.
    #[error("Synthesis failed after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        /// Number of attempts made.
        attempts: u32,
        /// Message of the final underlying failure.
        last_error: String,
    },

    /// The run was cancelled while this synthesis was pending.
    ///
    /// Not a failure: the orchestrator maps this to the explicit
    /// no-result outcome rather than propagating an error.
    #[error("Synthesis cancelled")]
    Cancelled,
}

impl SpeechError {
    /// Create a service error.
    pub fn service(message: impl Into<String>) -> Self {
        Self::Service(message.into())
    }

    /// Create an I/O error from a `std::io::Error`.
    #[must_use]
    pub fn from_io_error(err: &std::io::Error) -> Self {
        Self::Io(err.to_string())
    }

    /// Whether this error is a cancellation rather than a failure.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Port for the remote speech-synthesis service.
///
/// Implementations make exactly one service call per `synthesize`
/// invocation; retry policy belongs to the caller. The artifact contract
/// is file-based: on success the audio bytes for `text` have been written
/// to `target_path`.
#[async_trait]
pub trait SpeechSynthesizerPort: Send + Sync {
    /// Synthesize `text` with `settings`, writing the artifact to
    /// `target_path`. Empty or whitespace-only text is a no-op success.
    async fn synthesize(
        &self,
        text: &str,
        target_path: &Path,
        settings: &VoiceSettings,
    ) -> Result<(), SpeechError>;

    /// List the voices the service offers.
    async fn list_voices(&self) -> Result<Vec<VoiceInfo>, SpeechError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancelled_is_not_a_failure_classification() {
        assert!(SpeechError::Cancelled.is_cancelled());
        assert!(!SpeechError::service("boom").is_cancelled());
    }

    #[test]
    fn retries_exhausted_reports_attempts() {
        let err = SpeechError::RetriesExhausted {
            attempts: 5,
            last_error: "timeout".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains('5'));
        assert!(msg.contains("timeout"));
    }
}
