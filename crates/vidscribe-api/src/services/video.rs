//! Upload orchestration.
//!
//! `VideoService` sequences the media backend, object storage and AI
//! clients for each request. Nothing here is persisted: every operation is
//! request-scoped, and all intermediate files live in the shared temp
//! directory under per-request unique ids.

use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use vidscribe_ai::{Summarizer, Transcriber};
use vidscribe_media::MediaBackend;
use vidscribe_models::{Video, VideoFormat, VideoId, VideoStatus, THUMBNAIL_BUCKET, VIDEO_BUCKET};
use vidscribe_storage::ObjectStorage;

use crate::error::{ApiError, ApiResult};

/// Orchestrates uploads, transcript and summary generation.
#[derive(Clone)]
pub struct VideoService {
    media: Arc<dyn MediaBackend>,
    storage: Arc<dyn ObjectStorage>,
    transcriber: Arc<dyn Transcriber>,
    summarizer: Arc<dyn Summarizer>,
    temp_dir: PathBuf,
}

impl VideoService {
    pub fn new(
        media: Arc<dyn MediaBackend>,
        storage: Arc<dyn ObjectStorage>,
        transcriber: Arc<dyn Transcriber>,
        summarizer: Arc<dyn Summarizer>,
        temp_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            media,
            storage,
            transcriber,
            summarizer,
            temp_dir: temp_dir.into(),
        }
    }

    /// Process an uploaded video: validate, derive thumbnail and duration,
    /// persist both assets, and return the assembled record.
    ///
    /// Validation happens before any side effect; temp artifacts are
    /// removed on every exit path once the upload has been written to disk.
    pub async fn upload(
        &self,
        title: String,
        description: String,
        filename: &str,
        bytes: Vec<u8>,
    ) -> ApiResult<Video> {
        let format = VideoFormat::from_filename(filename)
            .ok_or_else(|| ApiError::bad_request("Unsupported file format"))?;

        let id = VideoId::new();
        let video_key = format!("{}{}", id, format.extension());
        let thumbnail_key = format!("{id}.jpg");

        let temp_video = self.temp_dir.join(&video_key);
        tokio::fs::write(&temp_video, &bytes).await?;

        let _cleanup = scopeguard::guard(
            (temp_video.clone(), self.temp_dir.join(&thumbnail_key)),
            |(video, thumbnail)| {
                let _ = std::fs::remove_file(video);
                let _ = std::fs::remove_file(thumbnail);
            },
        );

        let thumbnail_path = self.media.create_thumbnail(&temp_video).await?;

        // Duration failure is the sole tolerated partial failure
        let duration = match self.media.video_duration(&temp_video).await {
            Ok(seconds) => Some(seconds),
            Err(e) => {
                warn!("Failed to get video duration for {id}: {e}");
                None
            }
        };

        let video_url = self
            .storage
            .upload(VIDEO_BUCKET, &video_key, bytes, format.content_type())
            .await?;
        let thumbnail_url = self
            .storage
            .upload_from_path(THUMBNAIL_BUCKET, &thumbnail_key, &thumbnail_path)
            .await?;

        info!("Uploaded video {id} ({video_key})");

        Ok(Video {
            id,
            title,
            description,
            file_path: video_key,
            video_url,
            thumbnail_url,
            duration,
            transcript: None,
            summary: None,
            status: VideoStatus::Processing,
            uploaded_at: Utc::now(),
            processed_at: None,
        })
    }

    /// Generate a transcript for an already-stored video.
    ///
    /// Downloads the stored object, extracts its audio track and forwards
    /// it to the transcription client. Both intermediate temp files are
    /// removed whether or not any later step succeeds.
    pub async fn generate_transcript(&self, id: &VideoId) -> ApiResult<String> {
        let key = format!("{id}.mp4");
        let bytes = self.storage.download(VIDEO_BUCKET, &key).await?;

        let temp_video = self.temp_dir.join(&key);
        tokio::fs::write(&temp_video, &bytes).await?;

        let _cleanup = scopeguard::guard(
            (temp_video.clone(), self.temp_dir.join(format!("{id}.mp3"))),
            |(video, audio)| {
                let _ = std::fs::remove_file(video);
                let _ = std::fs::remove_file(audio);
            },
        );

        let audio_path = self.media.extract_audio(&temp_video).await?;
        let transcript = self.transcriber.transcribe(&audio_path).await?;

        info!("Transcribed video {id}");
        Ok(transcript)
    }

    /// Generate a summary from already-available transcript text.
    pub async fn generate_summary(&self, text: &str) -> ApiResult<String> {
        Ok(self.summarizer.summarize(text).await?)
    }

    /// Deterministic public URL of a stored video, no existence check.
    pub fn video_url(&self, id: &str) -> String {
        self.storage.public_url(VIDEO_BUCKET, &format!("{id}.mp4"))
    }

    /// Deterministic public URL of a stored thumbnail, no existence check.
    pub fn thumbnail_url(&self, id: &str) -> String {
        self.storage.public_url(THUMBNAIL_BUCKET, &format!("{id}.jpg"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tempfile::TempDir;

    use vidscribe_ai::{AiError, AiResult};
    use vidscribe_media::{MediaError, MediaResult};
    use vidscribe_storage::{StorageError, StorageResult};

    #[derive(Default)]
    struct FakeMedia {
        fail_thumbnail: bool,
        fail_duration: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl MediaBackend for FakeMedia {
        async fn extract_audio(&self, video_path: &Path) -> MediaResult<PathBuf> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let audio = video_path.with_extension("mp3");
            std::fs::write(&audio, b"mp3")?;
            Ok(audio)
        }

        async fn create_thumbnail(&self, video_path: &Path) -> MediaResult<PathBuf> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_thumbnail {
                return Err(MediaError::ffmpeg_failed(
                    "FFmpeg exited with non-zero status",
                    Some("boom".into()),
                    Some(1),
                ));
            }
            let thumbnail = video_path.with_extension("jpg");
            std::fs::write(&thumbnail, b"jpg")?;
            Ok(thumbnail)
        }

        async fn video_duration(&self, _video_path: &Path) -> MediaResult<f64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_duration {
                return Err(MediaError::InvalidDuration(Some("N/A".into())));
            }
            Ok(42.5)
        }
    }

    #[derive(Default)]
    struct FakeStorage {
        uploads: Mutex<Vec<(String, String)>>,
        download_missing: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ObjectStorage for FakeStorage {
        async fn upload(
            &self,
            bucket: &str,
            key: &str,
            _bytes: Vec<u8>,
            _content_type: &str,
        ) -> StorageResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.uploads
                .lock()
                .unwrap()
                .push((bucket.to_string(), key.to_string()));
            Ok(self.public_url(bucket, key))
        }

        async fn upload_from_path(
            &self,
            bucket: &str,
            key: &str,
            path: &Path,
        ) -> StorageResult<String> {
            let bytes = std::fs::read(path)?;
            self.upload(bucket, key, bytes, "application/octet-stream")
                .await
        }

        async fn download(&self, bucket: &str, key: &str) -> StorageResult<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.download_missing {
                return Err(StorageError::not_found(format!("{bucket}/{key}")));
            }
            Ok(b"stored video bytes".to_vec())
        }

        fn public_url(&self, bucket: &str, key: &str) -> String {
            format!("https://store.test/storage/v1/object/public/{bucket}/{key}")
        }
    }

    #[derive(Default)]
    struct FakeTranscriber {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Transcriber for FakeTranscriber {
        async fn transcribe(&self, _audio_path: &Path) -> AiResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok("the transcript".to_string())
        }
    }

    #[derive(Default)]
    struct FakeSummarizer {
        fail: bool,
    }

    #[async_trait]
    impl Summarizer for FakeSummarizer {
        async fn summarize(&self, _text: &str) -> AiResult<String> {
            if self.fail {
                return Err(AiError::NoSummary);
            }
            Ok("the summary".to_string())
        }
    }

    struct Harness {
        media: Arc<FakeMedia>,
        storage: Arc<FakeStorage>,
        transcriber: Arc<FakeTranscriber>,
        service: VideoService,
        temp: TempDir,
    }

    fn harness(media: FakeMedia, storage: FakeStorage) -> Harness {
        let temp = TempDir::new().unwrap();
        let media = Arc::new(media);
        let storage = Arc::new(storage);
        let transcriber = Arc::new(FakeTranscriber::default());
        let service = VideoService::new(
            media.clone(),
            storage.clone(),
            transcriber.clone(),
            Arc::new(FakeSummarizer::default()),
            temp.path(),
        );
        Harness {
            media,
            storage,
            transcriber,
            service,
            temp,
        }
    }

    fn temp_entries(temp: &TempDir) -> usize {
        std::fs::read_dir(temp.path()).unwrap().count()
    }

    #[tokio::test]
    async fn upload_succeeds_with_fresh_ids() {
        let h = harness(FakeMedia::default(), FakeStorage::default());

        let a = h
            .service
            .upload("one".into(), "".into(), "clip.mp4", b"v".to_vec())
            .await
            .unwrap();
        let b = h
            .service
            .upload("two".into(), "".into(), "clip.mov", b"v".to_vec())
            .await
            .unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(a.status, VideoStatus::Processing);
        assert_eq!(a.duration, Some(42.5));
        assert_eq!(a.file_path, format!("{}.mp4", a.id));
        assert_eq!(
            a.video_url,
            format!("https://store.test/storage/v1/object/public/videos/{}.mp4", a.id)
        );
        assert_eq!(
            a.thumbnail_url,
            format!("https://store.test/storage/v1/object/public/thumbnails/{}.jpg", a.id)
        );

        let uploads = h.storage.uploads.lock().unwrap();
        assert_eq!(uploads.len(), 4);
        assert!(uploads.iter().any(|(b, _)| b == "videos"));
        assert!(uploads.iter().any(|(b, _)| b == "thumbnails"));
    }

    #[tokio::test]
    async fn bad_extension_rejected_before_any_collaborator_call() {
        let h = harness(FakeMedia::default(), FakeStorage::default());

        for filename in ["notes.txt", "clip.mkv", "noextension"] {
            let err = h
                .service
                .upload("t".into(), "".into(), filename, b"v".to_vec())
                .await
                .unwrap_err();
            assert!(matches!(err, ApiError::BadRequest(_)));
        }

        assert_eq!(h.media.calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.storage.calls.load(Ordering::SeqCst), 0);
        assert_eq!(temp_entries(&h.temp), 0);
    }

    #[tokio::test]
    async fn duration_failure_is_not_fatal() {
        let h = harness(
            FakeMedia {
                fail_duration: true,
                ..Default::default()
            },
            FakeStorage::default(),
        );

        let video = h
            .service
            .upload("t".into(), "".into(), "clip.mp4", b"v".to_vec())
            .await
            .unwrap();

        assert_eq!(video.duration, None);
        assert_eq!(video.status, VideoStatus::Processing);
    }

    #[tokio::test]
    async fn thumbnail_failure_aborts_before_any_upload() {
        let h = harness(
            FakeMedia {
                fail_thumbnail: true,
                ..Default::default()
            },
            FakeStorage::default(),
        );

        let err = h
            .service
            .upload("t".into(), "".into(), "clip.mp4", b"v".to_vec())
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Media(_)));
        assert_eq!(h.storage.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn temp_files_removed_after_success_and_failure() {
        let ok = harness(FakeMedia::default(), FakeStorage::default());
        ok.service
            .upload("t".into(), "".into(), "clip.mp4", b"v".to_vec())
            .await
            .unwrap();
        assert_eq!(temp_entries(&ok.temp), 0);

        let failing = harness(
            FakeMedia {
                fail_thumbnail: true,
                ..Default::default()
            },
            FakeStorage::default(),
        );
        let _ = failing
            .service
            .upload("t".into(), "".into(), "clip.mp4", b"v".to_vec())
            .await;
        assert_eq!(temp_entries(&failing.temp), 0);
    }

    #[tokio::test]
    async fn transcript_flow_cleans_up_and_returns_text() {
        let h = harness(FakeMedia::default(), FakeStorage::default());

        let id = VideoId::from("abc123");
        let transcript = h.service.generate_transcript(&id).await.unwrap();

        assert_eq!(transcript, "the transcript");
        assert_eq!(h.transcriber.calls.load(Ordering::SeqCst), 1);
        assert_eq!(temp_entries(&h.temp), 0);
    }

    #[tokio::test]
    async fn transcript_for_missing_video_is_not_found() {
        let h = harness(
            FakeMedia::default(),
            FakeStorage {
                download_missing: true,
                ..Default::default()
            },
        );

        let err = h
            .service
            .generate_transcript(&VideoId::from("ghost"))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Storage(StorageError::NotFound(_))));
        assert_eq!(h.media.calls.load(Ordering::SeqCst), 0);
        assert_eq!(temp_entries(&h.temp), 0);
    }

    #[tokio::test]
    async fn summary_delegates_to_summarizer() {
        let h = harness(FakeMedia::default(), FakeStorage::default());
        assert_eq!(h.service.generate_summary("text").await.unwrap(), "the summary");

        let failing = VideoService::new(
            Arc::new(FakeMedia::default()),
            Arc::new(FakeStorage::default()),
            Arc::new(FakeTranscriber::default()),
            Arc::new(FakeSummarizer { fail: true }),
            h.temp.path(),
        );
        assert!(matches!(
            failing.generate_summary("text").await.unwrap_err(),
            ApiError::Ai(AiError::NoSummary)
        ));
    }

    #[tokio::test]
    async fn redirect_urls_are_deterministic() {
        let h = harness(FakeMedia::default(), FakeStorage::default());

        assert_eq!(
            h.service.video_url("abc123"),
            "https://store.test/storage/v1/object/public/videos/abc123.mp4"
        );
        assert_eq!(
            h.service.thumbnail_url("abc123"),
            "https://store.test/storage/v1/object/public/thumbnails/abc123.jpg"
        );
    }
}
