//! Application state.

use std::sync::Arc;

use vidscribe_ai::{ChatSummarizer, WhisperClient};
use vidscribe_media::FfmpegProcessor;
use vidscribe_storage::StorageClient;

use crate::config::ApiConfig;
use crate::services::VideoService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub videos: VideoService,
}

impl AppState {
    /// Create new application state, wiring the real collaborators.
    ///
    /// Fails fast when ffmpeg/ffprobe are missing, the temp directory
    /// cannot be created, or a credential is absent.
    pub fn new(config: ApiConfig) -> anyhow::Result<Self> {
        let media = FfmpegProcessor::new(&config.temp_dir)?;
        let storage = StorageClient::from_env()?;

        let ai_key = std::env::var("OPENAI_API_KEY").unwrap_or_default();
        let transcriber = WhisperClient::new(ai_key.clone())?;
        let summarizer = ChatSummarizer::new(ai_key)?;

        let videos = VideoService::new(
            Arc::new(media),
            Arc::new(storage),
            Arc::new(transcriber),
            Arc::new(summarizer),
            config.temp_dir.clone(),
        );

        Ok(Self { config, videos })
    }
}
