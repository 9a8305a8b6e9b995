//! Shared data models for the vidscribe backend.

pub mod format;
pub mod video;

pub use format::VideoFormat;
pub use video::{Video, VideoId, VideoStatus};

/// Bucket holding original video files.
pub const VIDEO_BUCKET: &str = "videos";

/// Bucket holding thumbnail images.
pub const THUMBNAIL_BUCKET: &str = "thumbnails";
