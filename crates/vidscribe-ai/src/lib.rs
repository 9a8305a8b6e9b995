//! Clients for the remote speech-to-text and summarization endpoints.

pub mod error;
pub mod summarization;
pub mod transcription;

pub use error::{AiError, AiResult};
pub use summarization::{ChatSummarizer, Summarizer};
pub use transcription::{Transcriber, WhisperClient};
