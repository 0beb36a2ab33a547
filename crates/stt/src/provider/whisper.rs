use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};

use crate::{
    error::SttError,
    types::{TranscriptionRequest, TranscriptionResponse},
};

use super::{SttProvider, assemblyai::ProviderSettings};

const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1";
const DEFAULT_WHISPER_MODEL: &str = "whisper-1";

/// `OpenAI` Whisper STT provider
pub(crate) struct WhisperProvider {
    client: Client,
    base_url: String,
    api_key: SecretString,
    name: String,
    model: String,
    language: Option<String>,
    request_timeout: Duration,
}

impl WhisperProvider {
    pub fn new(
        name: String,
        api_key: SecretString,
        base_url: Option<String>,
        model: Option<String>,
        settings: ProviderSettings,
    ) -> Self {
        let client = dubber_core::http_client();
        let base_url = base_url.unwrap_or_else(|| DEFAULT_OPENAI_API_URL.to_string());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            name,
            model: model.unwrap_or_else(|| DEFAULT_WHISPER_MODEL.to_string()),
            language: settings.language,
            request_timeout: settings.request_timeout,
        }
    }
}

#[derive(serde::Deserialize)]
struct WhisperResponse {
    text: String,
}

#[async_trait]
impl SttProvider for WhisperProvider {
    async fn transcribe(&self, request: &TranscriptionRequest) -> crate::error::Result<TranscriptionResponse> {
        let url = format!("{}/audio/transcriptions", self.base_url);
        let media = tokio::fs::read(&request.path).await?;
        let timeout = dubber_core::transfer_timeout(self.request_timeout, media.len() as u64);

        tracing::debug!(
            "Whisper transcription request: {} bytes, model={}",
            media.len(),
            self.model,
        );

        let mut form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(media)
                    .file_name(request.filename.clone())
                    .mime_str(&request.content_type)
                    .map_err(|e| SttError::InvalidRequest(format!("Invalid content type: {e}")))?,
            )
            .text("model", self.model.clone());

        if let Some(language) = &self.language {
            form = form.text("language", language.clone());
        }

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key.expose_secret()))
            .timeout(timeout)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Whisper request failed: {e}");
                SttError::ConnectionError(format!("Failed to send request to Whisper: {e}"))
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

            tracing::error!("Whisper API error ({status}): {error_text}");

            return Err(SttError::from_status(status, error_text));
        }

        let result: WhisperResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Whisper response: {e}");
            SttError::InvalidResponse(format!("Whisper: {e}"))
        })?;

        tracing::debug!("Whisper transcription complete");

        Ok(TranscriptionResponse { text: result.text })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
