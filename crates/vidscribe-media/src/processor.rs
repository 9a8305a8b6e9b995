//! The media backend trait and its FFmpeg implementation.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::command::{check_ffmpeg, check_ffprobe};
use crate::error::{MediaError, MediaResult};
use crate::{audio, probe, thumbnail};

/// Capability interface over the external media tool.
///
/// The orchestrator only depends on this trait, so a future in-process
/// decoder (or a test double) can be substituted without touching it.
#[async_trait]
pub trait MediaBackend: Send + Sync {
    /// Extract the audio track of a video into the adapter's temp directory.
    async fn extract_audio(&self, video_path: &Path) -> MediaResult<PathBuf>;

    /// Extract a single still frame into the adapter's temp directory.
    async fn create_thumbnail(&self, video_path: &Path) -> MediaResult<PathBuf>;

    /// Query the container duration in seconds.
    async fn video_duration(&self, video_path: &Path) -> MediaResult<f64>;
}

/// FFmpeg-backed media processor scoped to a shared temp directory.
///
/// All operations write into the temp directory; callers are responsible
/// for deleting temp artifacts after use.
#[derive(Debug, Clone)]
pub struct FfmpegProcessor {
    temp_dir: PathBuf,
}

impl FfmpegProcessor {
    /// Create a processor, failing fast if ffmpeg/ffprobe are not on PATH
    /// or the temp directory cannot be created.
    pub fn new(temp_dir: impl Into<PathBuf>) -> MediaResult<Self> {
        let temp_dir = temp_dir.into();

        check_ffmpeg()?;
        check_ffprobe()?;

        if !temp_dir.exists() {
            std::fs::create_dir_all(&temp_dir).map_err(|source| MediaError::TempDir {
                path: temp_dir.clone(),
                source,
            })?;
        }

        Ok(Self { temp_dir })
    }

    /// The shared temp directory this processor writes into.
    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }
}

#[async_trait]
impl MediaBackend for FfmpegProcessor {
    async fn extract_audio(&self, video_path: &Path) -> MediaResult<PathBuf> {
        audio::extract_audio(&self.temp_dir, video_path).await
    }

    async fn create_thumbnail(&self, video_path: &Path) -> MediaResult<PathBuf> {
        thumbnail::create_thumbnail(&self.temp_dir, video_path).await
    }

    async fn video_duration(&self, video_path: &Path) -> MediaResult<f64> {
        probe::get_duration(video_path).await
    }
}
