use thiserror::Error;

pub type Result<T> = std::result::Result<T, TtsError>;

/// Text-to-speech errors
#[derive(Debug, Error)]
pub enum TtsError {
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

    /// Network or connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Provider answered with a body that could not be parsed
    #[error("Invalid response from provider: {0}")]
    InvalidResponse(String),
}

impl TtsError {
    /// Map a non-success provider response to an error
    pub(crate) fn from_status(status: reqwest::StatusCode, message: String) -> Self {
        match status.as_u16() {
            401 => Self::AuthenticationFailed(message),
            400 => Self::InvalidRequest(message),
            code => Self::ProviderApiError { status: code, message },
        }
    }
}
