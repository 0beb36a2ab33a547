use std::sync::Arc;

use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
};

use crate::{
    AppState,
    error::{Result, ServerError},
    pipeline::DubbingResult,
};

/// Form field carrying the video
const VIDEO_FIELD: &str = "video";

/// Handle `POST /process-video`
///
/// Fields other than `video` are skipped. The upload is written to disk
/// before any provider is called.
pub async fn process_video(
    State(state): State<Arc<AppState>>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<DubbingResult>> {
    let mut multipart = multipart.map_err(|e| ServerError::InvalidForm(e.body_text()))?;
    let limit = state.uploads.max_bytes();
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::from_multipart(&e, limit))?
    {
        if field.name() != Some(VIDEO_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        if filename.is_empty() {
            return Err(ServerError::EmptyFilename);
        }

        tracing::debug!(%filename, "receiving video upload");

        upload = Some(state.uploads.save(field, filename).await?);
        break;
    }

    let upload = upload.ok_or(ServerError::MissingVideo)?;
    let result = state.pipeline.run(upload).await?;

    Ok(Json(result))
}
