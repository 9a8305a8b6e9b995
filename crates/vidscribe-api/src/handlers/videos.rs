//! Video upload, redirect, transcript and summary handlers.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::Redirect;
use axum::Json;
use serde::{Deserialize, Serialize};

use vidscribe_models::{Video, VideoId};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// `POST /videos` — multipart form with a `video` file field plus
/// `title`/`description` text fields.
pub async fn upload_video(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<Video>)> {
    let mut title = String::new();
    let mut description = String::new();
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Failed to read multipart form: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "video" => {
                let filename = field
                    .file_name()
                    .map(|s| s.to_string())
                    .ok_or_else(|| ApiError::bad_request("No video file provided"))?;
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read file data: {e}")))?;
                file = Some((filename, bytes.to_vec()));
            }
            "title" => {
                title = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read title: {e}")))?;
            }
            "description" => {
                description = field.text().await.map_err(|e| {
                    ApiError::bad_request(format!("Failed to read description: {e}"))
                })?;
            }
            _ => {}
        }
    }

    let (filename, bytes) =
        file.ok_or_else(|| ApiError::bad_request("No video file provided"))?;

    let video = state
        .videos
        .upload(title, description, &filename, bytes)
        .await?;

    Ok((StatusCode::CREATED, Json(video)))
}

/// `GET /videos/:id` — redirect to the public video URL.
pub async fn get_video(State(state): State<AppState>, Path(id): Path<String>) -> Redirect {
    Redirect::temporary(&state.videos.video_url(&id))
}

/// `GET /thumbnails/:id` — redirect to the public thumbnail URL.
pub async fn get_thumbnail(State(state): State<AppState>, Path(id): Path<String>) -> Redirect {
    Redirect::temporary(&state.videos.thumbnail_url(&id))
}

#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub video_id: String,
    pub transcript: String,
}

/// `POST /videos/:id/transcript` — download the stored video, extract its
/// audio and transcribe it.
pub async fn generate_transcript(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<TranscriptResponse>> {
    let video_id = VideoId::from(id);
    let transcript = state.videos.generate_transcript(&video_id).await?;

    Ok(Json(TranscriptResponse {
        status: "success",
        message: "Audio transcribed successfully",
        video_id: video_id.to_string(),
        transcript,
    }))
}

#[derive(Debug, Deserialize)]
pub struct SummaryRequest {
    pub transcript: String,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub status: &'static str,
    pub video_id: String,
    pub summary: String,
}

/// `POST /videos/:id/summary` — summarize already-available transcript text.
pub async fn generate_summary(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SummaryRequest>,
) -> ApiResult<Json<SummaryResponse>> {
    let summary = state.videos.generate_summary(&request.transcript).await?;

    Ok(Json(SummaryResponse {
        status: "success",
        video_id: id,
        summary,
    }))
}
