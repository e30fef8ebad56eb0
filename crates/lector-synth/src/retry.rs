//! Retrying wrapper around the speech port.
//!
//! The remote service reports failures opaquely, so every error is
//! treated as transient until attempts run out. An attempt only counts
//! as successful when the artifact actually exists and is non-empty - an
//! empty file from a half-failed service call is a failure, not a silent
//! success.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use lector_core::domain::VoiceSettings;
use lector_core::ports::{SpeechError, SpeechSynthesizerPort};

/// Retry behaviour for synthesis calls.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts per chunk (first try included).
    pub max_attempts: u32,
    /// Base delay for exponential backoff.
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// The default policy: 5 attempts, 2s base delay.
    #[must_use]
    pub const fn with_defaults() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(2),
        }
    }

    /// Backoff before the retry following zero-indexed `attempt`:
    /// `base_delay * 2^attempt` plus up to one second of jitter.
    #[must_use]
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let exp = self.base_delay.saturating_mul(2u32.saturating_pow(attempt));
        let jitter = Duration::from_millis(rand::thread_rng().gen_range(0..1000));
        exp.saturating_add(jitter)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Speech client with bounded exponential-backoff retry and artifact
/// validation.
pub struct RetryingSpeechClient {
    inner: Arc<dyn SpeechSynthesizerPort>,
    policy: RetryPolicy,
}

impl RetryingSpeechClient {
    /// Wrap a speech port with the given retry policy.
    pub fn new(inner: Arc<dyn SpeechSynthesizerPort>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    /// Synthesize `text` to `target_path`, retrying transient failures.
    ///
    /// Fails with [`SpeechError::RetriesExhausted`] only after
    /// `max_attempts` attempts. The backoff wait is cancellation-aware: a
    /// set token interrupts the wait and yields
    /// [`SpeechError::Cancelled`] instead of blocking out the delay.
    pub async fn synthesize(
        &self,
        text: &str,
        target_path: &Path,
        settings: &VoiceSettings,
        cancel: &CancellationToken,
    ) -> Result<(), SpeechError> {
        let mut last_error = String::new();

        for attempt in 0..self.policy.max_attempts {
            if cancel.is_cancelled() {
                return Err(SpeechError::Cancelled);
            }

            match self.attempt(text, target_path, settings).await {
                Ok(()) => return Ok(()),
                Err(SpeechError::Cancelled) => return Err(SpeechError::Cancelled),
                Err(e) => {
                    last_error = e.to_string();
                    if attempt + 1 < self.policy.max_attempts {
                        let delay = self.policy.backoff_delay(attempt);
                        warn!(
                            attempt = attempt + 1,
                            max = self.policy.max_attempts,
                            delay_ms = delay.as_millis() as u64,
                            error = %last_error,
                            "synthesis attempt failed, backing off"
                        );
                        tokio::select! {
                            biased;

                            () = cancel.cancelled() => {
                                return Err(SpeechError::Cancelled);
                            }

                            () = tokio::time::sleep(delay) => {}
                        }
                    }
                }
            }
        }

        Err(SpeechError::RetriesExhausted {
            attempts: self.policy.max_attempts,
            last_error,
        })
    }

    /// One service call plus artifact validation.
    async fn attempt(
        &self,
        text: &str,
        target_path: &Path,
        settings: &VoiceSettings,
    ) -> Result<(), SpeechError> {
        self.inner.synthesize(text, target_path, settings).await?;

        match tokio::fs::metadata(target_path).await {
            Ok(meta) if meta.len() > 0 => {
                debug!(path = %target_path.display(), bytes = meta.len(), "chunk synthesized");
                Ok(())
            }
            _ => Err(SpeechError::EmptyArtifact {
                path: target_path.display().to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_grows_exponentially_with_bounded_jitter() {
        let policy = RetryPolicy {
            max_attempts: 5,
            base_delay: Duration::from_secs(2),
        };
        for attempt in 0..4 {
            let expected = Duration::from_secs(2 << attempt);
            let delay = policy.backoff_delay(attempt);
            assert!(delay >= expected, "delay {delay:?} below floor at {attempt}");
            assert!(
                delay < expected + Duration::from_secs(1),
                "jitter exceeds one second at {attempt}"
            );
        }
    }
}
