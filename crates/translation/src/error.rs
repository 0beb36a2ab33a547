use thiserror::Error;

pub type Result<T> = std::result::Result<T, TranslationError>;

/// Translation errors
#[derive(Debug, Error)]
pub enum TranslationError {
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

    /// The provider answered with a body we could not interpret
    #[error("Unexpected translation response: {0}")]
    InvalidResponse(String),

    /// Network or connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl TranslationError {
    /// Map a non-success provider response to an error
    pub(crate) fn from_status(status: reqwest::StatusCode, message: String) -> Self {
        match status.as_u16() {
            401 | 403 => Self::AuthenticationFailed(message),
            400 => Self::InvalidRequest(message),
            code => Self::ProviderApiError { status: code, message },
        }
    }
}
