//! FFmpeg CLI adapter for video processing.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building
//! - Container probing via ffprobe (duration, audio-stream detection)
//! - Audio extraction with silent-track synthesis for mute inputs
//! - Thumbnail generation
//! - The [`MediaBackend`] trait so an in-process decoder could be
//!   substituted without touching the upload orchestrator

pub mod audio;
pub mod command;
pub mod error;
pub mod probe;
pub mod processor;
pub mod thumbnail;

pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand};
pub use error::{MediaError, MediaResult};
pub use probe::{probe_video, VideoInfo};
pub use processor::{FfmpegProcessor, MediaBackend};
