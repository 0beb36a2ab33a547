use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SttError>;

/// Speech-to-text errors
#[derive(Debug, Error)]
pub enum SttError {
    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Authentication failed (missing or invalid API key)
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Provider not found in configuration
    #[error("Provider '{0}' not found")]
    ProviderNotFound(String),

    /// Provider API returned an error status
    #[error("Provider API error ({status}): {message}")]
    ProviderApiError { status: u16, message: String },

    /// The provider accepted the audio but reported the transcription as failed
    ///
    /// Displays the provider's message verbatim.
    #[error("{0}")]
    TranscriptionFailed(String),

    /// The transcript did not finish within the configured poll timeout
    #[error("Transcription did not complete within {0:?}")]
    Timeout(Duration),

    /// Network or connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Reading the uploaded media failed
    #[error("Failed to read media file: {0}")]
    Io(#[from] std::io::Error),

    /// Provider answered with a body that could not be parsed
    #[error("Invalid response from provider: {0}")]
    InvalidResponse(String),
}

impl SttError {
    /// Map a non-success provider response to an error
    pub(crate) fn from_status(status: reqwest::StatusCode, message: String) -> Self {
        match status.as_u16() {
            401 => Self::AuthenticationFailed(message),
            400 => Self::InvalidRequest(message),
            code => Self::ProviderApiError { status: code, message },
        }
    }
}
