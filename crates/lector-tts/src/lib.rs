//! HTTP adapter for the remote speech-synthesis service.
//!
//! One port call is one service call: the retry policy lives entirely in
//! the pipeline's retrying client, so this adapter surfaces every
//! failure - network, quota, server error - as an opaque
//! [`SpeechError::Service`] and lets the caller decide.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use lector_core::domain::VoiceSettings;
use lector_core::ports::{SpeechError, SpeechSynthesizerPort, VoiceInfo};

/// Environment variable naming the service endpoint.
pub const ENDPOINT_ENV: &str = "LECTOR_TTS_ENDPOINT";

/// Environment variable carrying the API key.
pub const API_KEY_ENV: &str = "LECTOR_TTS_API_KEY";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for the speech service.
#[derive(Debug, Clone)]
pub struct SpeechServiceConfig {
    /// Service base URL (no trailing slash required).
    pub endpoint: String,
    /// Bearer token, when the service requires one.
    pub api_key: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl SpeechServiceConfig {
    /// Build a config for `endpoint` with the default timeout.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Read endpoint and API key from the environment.
    ///
    /// Returns `None` when no endpoint is configured.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let endpoint = std::env::var(ENDPOINT_ENV).ok()?;
        Some(Self {
            endpoint,
            api_key: std::env::var(API_KEY_ENV).ok(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint.trim_end_matches('/'), path)
    }
}

/// Wire shape of a synthesis request.
#[derive(Debug, Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    voice: &'a str,
    rate: &'a str,
    pitch: &'a str,
}

/// Speech port implementation over a managed HTTP connection.
pub struct HttpSpeechService {
    client: reqwest::Client,
    config: SpeechServiceConfig,
}

impl HttpSpeechService {
    /// Create a client for the configured service.
    #[must_use]
    pub fn new(config: SpeechServiceConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("failed to create HTTP client");
        Self { client, config }
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_key {
            Some(key) => request.header("Authorization", format!("Bearer {key}")),
            None => request,
        }
    }
}

#[async_trait]
impl SpeechSynthesizerPort for HttpSpeechService {
    async fn synthesize(
        &self,
        text: &str,
        target_path: &Path,
        settings: &VoiceSettings,
    ) -> Result<(), SpeechError> {
        if text.trim().is_empty() {
            return Ok(());
        }

        let request = SynthesisRequest {
            text,
            voice: &settings.voice_id,
            rate: &settings.rate,
            pitch: &settings.pitch,
        };

        let response = self
            .authorize(self.client.post(self.config.url("synthesize")))
            .json(&request)
            .send()
            .await
            .map_err(|e| SpeechError::service(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpeechError::service(format!("HTTP {status}: {body}")));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| SpeechError::service(e.to_string()))?;
        tokio::fs::write(target_path, &audio)
            .await
            .map_err(|e| SpeechError::from_io_error(&e))?;

        debug!(bytes = audio.len(), path = %target_path.display(), "received synthesis artifact");
        Ok(())
    }

    async fn list_voices(&self) -> Result<Vec<VoiceInfo>, SpeechError> {
        let response = self
            .authorize(self.client.get(self.config.url("voices")))
            .send()
            .await
            .map_err(|e| SpeechError::service(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SpeechError::service(format!("HTTP {status}")));
        }

        response
            .json::<Vec<VoiceInfo>>()
            .await
            .map_err(|e| SpeechError::service(e.to_string()))
    }
}
