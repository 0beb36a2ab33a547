pub(crate) mod assemblyai;
pub(crate) mod whisper;

use async_trait::async_trait;

use crate::types::{TranscriptionRequest, TranscriptionResponse};

/// Trait for STT provider implementations
#[async_trait]
pub(crate) trait SttProvider: Send + Sync {
    /// Transcribe the media file to text
    async fn transcribe(&self, request: &TranscriptionRequest) -> crate::error::Result<TranscriptionResponse>;

    /// Get the provider name
    fn name(&self) -> &str;
}
