//! Video record and identifiers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an uploaded video.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(pub String);

impl VideoId {
    /// Generate a new random video ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for VideoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for VideoId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for VideoId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Video processing status.
///
/// Only `Processing` is assigned by the upload flow today; the remaining
/// variants exist for callers that persist records downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VideoStatus {
    Pending,
    #[default]
    Processing,
    Completed,
    Failed,
}

impl VideoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoStatus::Pending => "pending",
            VideoStatus::Processing => "processing",
            VideoStatus::Completed => "completed",
            VideoStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for VideoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A video record as returned by the upload API.
///
/// The record is constructed and returned per-request; durable storage of
/// it is a downstream concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    /// Unique video ID, immutable once assigned.
    pub id: VideoId,

    /// Video title.
    pub title: String,

    /// Free-text description, may be empty.
    pub description: String,

    /// Storage key inside the videos bucket (`{id}{ext}`).
    pub file_path: String,

    /// Public URL of the stored video.
    pub video_url: String,

    /// Public URL of the stored thumbnail.
    pub thumbnail_url: String,

    /// Duration in seconds; absence is not an error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,

    /// Transcript text, if generated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,

    /// Summary text, if generated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Processing status.
    #[serde(default)]
    pub status: VideoStatus,

    /// Upload timestamp.
    pub uploaded_at: DateTime<Utc>,

    /// Set when downstream processing finishes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_ids_are_unique() {
        let a = VideoId::new();
        let b = VideoId::new();
        assert_ne!(a, b);
        // UUID-strength ids
        assert_eq!(a.as_str().len(), 36);
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&VideoStatus::Processing).unwrap(), "\"processing\"");
        assert_eq!(
            serde_json::from_str::<VideoStatus>("\"failed\"").unwrap(),
            VideoStatus::Failed
        );
    }

    #[test]
    fn absent_duration_is_omitted() {
        let video = Video {
            id: VideoId::from("abc123"),
            title: "t".into(),
            description: String::new(),
            file_path: "abc123.mp4".into(),
            video_url: "https://example.test/v".into(),
            thumbnail_url: "https://example.test/t".into(),
            duration: None,
            transcript: None,
            summary: None,
            status: VideoStatus::Processing,
            uploaded_at: Utc::now(),
            processed_at: None,
        };

        let json = serde_json::to_value(&video).unwrap();
        assert!(json.get("duration").is_none());
        assert!(json.get("transcript").is_none());
        assert_eq!(json["status"], "processing");
    }
}
