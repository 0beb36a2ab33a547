use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use http::header;
use tokio_util::io::ReaderStream;

use crate::{AppState, error::Result};

/// Handle `GET /audio/{filename}`, streaming the file as an attachment
pub async fn download_audio(State(state): State<Arc<AppState>>, Path(filename): Path<String>) -> Result<Response> {
    let (file, len) = state.pipeline.audio.open(&filename).await?;
    let mime = mime_guess::from_path(&filename).first_or_octet_stream();

    tracing::debug!(%filename, bytes = len, "serving audio");

    Ok((
        [
            (header::CONTENT_TYPE, mime.to_string()),
            (header::CONTENT_LENGTH, len.to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{filename}\"")),
        ],
        Body::from_stream(ReaderStream::new(file)),
    )
        .into_response())
}
