//! FFprobe container probing.

use serde::Deserialize;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use crate::error::{MediaError, MediaResult};

/// Probed video file information.
#[derive(Debug, Clone)]
pub struct VideoInfo {
    /// Duration in seconds
    pub duration: f64,
    /// Whether the container has at least one audio stream
    pub has_audio: bool,
}

/// FFprobe JSON output format.
#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: String,
}

/// Probe a video file for duration and audio-stream presence.
pub async fn probe_video(path: impl AsRef<Path>) -> MediaResult<VideoInfo> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(MediaError::FileNotFound(path.to_path_buf()));
    }

    which::which("ffprobe").map_err(|_| MediaError::FfprobeNotFound)?;

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        return Err(MediaError::FfprobeFailed {
            message: "FFprobe failed".to_string(),
            stderr: Some(String::from_utf8_lossy(&output.stderr).to_string()),
        });
    }

    let probe: FfprobeOutput = serde_json::from_slice(&output.stdout)?;

    let duration = parse_duration(probe.format.duration.as_deref())?;
    let has_audio = probe.streams.iter().any(|s| s.codec_type == "audio");

    Ok(VideoInfo { duration, has_audio })
}

/// Get video duration in seconds.
pub async fn get_duration(path: impl AsRef<Path>) -> MediaResult<f64> {
    let info = probe_video(path).await?;
    Ok(info.duration)
}

/// Parse ffprobe's duration field; output that cannot be interpreted as a
/// floating-point value is a distinct error, not zero.
fn parse_duration(raw: Option<&str>) -> MediaResult<f64> {
    let raw = raw.ok_or(MediaError::InvalidDuration(None))?;
    raw.trim()
        .parse::<f64>()
        .map_err(|_| MediaError::InvalidDuration(Some(raw.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        assert!((parse_duration(Some("12.480000")).unwrap() - 12.48).abs() < 1e-9);
        assert!((parse_duration(Some(" 3.5 \n")).unwrap() - 3.5).abs() < 1e-9);
    }

    #[test]
    fn test_parse_duration_rejects_garbage() {
        assert!(matches!(
            parse_duration(Some("N/A")),
            Err(MediaError::InvalidDuration(Some(_)))
        ));
        assert!(matches!(
            parse_duration(None),
            Err(MediaError::InvalidDuration(None))
        ));
    }

    #[tokio::test]
    async fn test_probe_missing_file() {
        let err = probe_video("/definitely/not/here.mp4").await.unwrap_err();
        assert!(matches!(err, MediaError::FileNotFound(_)));
    }
}
