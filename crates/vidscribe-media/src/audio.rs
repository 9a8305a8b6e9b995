//! Audio track extraction.

use std::path::{Path, PathBuf};
use tracing::info;

use crate::command::FfmpegCommand;
use crate::error::MediaResult;
use crate::probe::probe_video;

/// Silent source fed to ffmpeg when the input has no audio stream.
const SILENT_SOURCE: &str = "anullsrc=r=44100:cl=stereo";

/// Extract the audio track of `video_path` as an mp3 next to `temp_dir`.
///
/// The output name derives from the input's base name, so repeated calls on
/// the same input overwrite rather than accumulate. Inputs without an audio
/// stream yield a synthesized silent track matching the container duration,
/// so downstream transcription always receives a valid audio file.
pub async fn extract_audio(temp_dir: &Path, video_path: &Path) -> MediaResult<PathBuf> {
    let audio_path = temp_dir.join(audio_file_name(video_path));

    let info = probe_video(video_path).await?;

    let cmd = if info.has_audio {
        FfmpegCommand::new(video_path, &audio_path)
            .no_video()
            .audio_codec("mp3")
    } else {
        info!(
            "No audio stream in {}, synthesizing {:.3}s of silence",
            video_path.display(),
            info.duration
        );
        FfmpegCommand::from_source(SILENT_SOURCE, &audio_path)
            .input_arg("-f")
            .input_arg("lavfi")
            .duration(format!("{}", info.duration))
            .audio_codec("mp3")
    };

    cmd.run().await?;

    Ok(audio_path)
}

fn audio_file_name(video_path: &Path) -> String {
    let stem = video_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    format!("{stem}.mp3")
}
