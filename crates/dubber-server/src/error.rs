use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

/// Errors surfaced by the HTTP handlers
///
/// Every variant renders as `{"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The form has no `video` field
    #[error("No video file part")]
    MissingVideo,

    /// The `video` field carries no filename
    #[error("No selected file")]
    EmptyFilename,

    /// The body could not be read as a multipart form
    #[error("{0}")]
    InvalidForm(String),

    /// The upload exceeded `storage.max_upload_bytes`
    #[error("Upload exceeds the limit of {limit} bytes")]
    PayloadTooLarge { limit: usize },

    /// Transcription succeeded but produced no words
    #[error("No speech detected in uploaded video")]
    NoSpeech,

    /// Requested audio file is not in the audio directory
    #[error("Audio file not found")]
    AudioNotFound,

    #[error(transparent)]
    Transcription(#[from] stt::SttError),

    #[error(transparent)]
    Translation(#[from] translation::TranslationError),

    #[error(transparent)]
    Synthesis(#[from] tts::TtsError),

    /// Reading or writing local files failed
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
}

impl ServerError {
    /// Classify a multipart read failure, keeping the body limit distinct
    pub fn from_multipart(error: &MultipartError, limit: usize) -> Self {
        if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge { limit }
        } else {
            Self::InvalidForm(error.body_text())
        }
    }

    /// Get the appropriate HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingVideo | Self::EmptyFilename | Self::InvalidForm(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::AudioNotFound => StatusCode::NOT_FOUND,
            Self::NoSpeech
            | Self::Transcription(_)
            | Self::Translation(_)
            | Self::Synthesis(_)
            | Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(%status, "request failed: {message}");
        } else {
            tracing::debug!(%status, "request rejected: {message}");
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
