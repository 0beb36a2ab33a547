use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A media file on local disk to transcribe
#[derive(Debug, Clone)]
pub struct TranscriptionRequest {
    /// Location of the uploaded audio or video
    pub path: PathBuf,
    /// Filename reported to the provider
    pub filename: String,
    /// Content type of the media
    pub content_type: String,
}

/// Recognized text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionResponse {
    pub text: String,
}
