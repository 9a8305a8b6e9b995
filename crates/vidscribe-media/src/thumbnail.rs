//! Thumbnail generation.

use std::path::{Path, PathBuf};

use crate::command::FfmpegCommand;
use crate::error::MediaResult;

/// Timestamp of the extracted still frame.
const THUMBNAIL_TIMESTAMP: &str = "00:00:01";

/// Extract a single still frame from a video as a jpeg in `temp_dir`.
pub async fn create_thumbnail(temp_dir: &Path, video_path: &Path) -> MediaResult<PathBuf> {
    let thumbnail_path = temp_dir.join(thumbnail_file_name(video_path));

    FfmpegCommand::new(video_path, &thumbnail_path)
        .seek(THUMBNAIL_TIMESTAMP)
        .single_frame()
        .run()
        .await?;

    Ok(thumbnail_path)
}

fn thumbnail_file_name(video_path: &Path) -> String {
    let stem = video_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    format!("{stem}.jpg")
}
