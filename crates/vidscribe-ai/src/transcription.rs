//! Speech-to-text client.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::error::{AiError, AiResult};

/// Default endpoint base.
const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Fixed model identifier sent with every request.
const TRANSCRIPTION_MODEL: &str = "whisper-1";

/// Transcription can take a while for long audio; bound it at 5 minutes.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Capability interface for speech-to-text services.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Submit an audio file and return the transcript text.
    async fn transcribe(&self, audio_path: &Path) -> AiResult<String>;
}

/// Whisper-backed transcription client.
pub struct WhisperClient {
    api_key: String,
    base_url: String,
    http: Client,
}

/// Response body of the transcription endpoint.
#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

impl WhisperClient {
    /// Create a new client. The credential is only required once a request
    /// is made, so the server can start without one configured.
    pub fn new(api_key: impl Into<String>) -> AiResult<Self> {
        Ok(Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
        })
    }

    /// Override the endpoint base URL (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl Transcriber for WhisperClient {
    async fn transcribe(&self, audio_path: &Path) -> AiResult<String> {
        if self.api_key.is_empty() {
            return Err(AiError::MissingApiKey);
        }

        let bytes = tokio::fs::read(audio_path).await?;
        debug!(
            "Transcribing {} ({} bytes)",
            audio_path.display(),
            bytes.len()
        );

        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name("audio.mp3"))
            .text("model", TRANSCRIPTION_MODEL);

        let response = self
            .http
            .post(format!("{}/v1/audio/transcriptions", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::RequestFailed {
                status: status.as_u16(),
                body,
            });
        }

        let body: TranscriptionResponse =
            serde_json::from_slice(&response.bytes().await?)?;
        Ok(body.text)
    }
}
