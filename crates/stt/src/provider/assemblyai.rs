use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio_util::io::ReaderStream;

use crate::{
    error::SttError,
    types::{TranscriptionRequest, TranscriptionResponse},
};

use super::SttProvider;

const DEFAULT_ASSEMBLYAI_API_URL: &str = "https://api.assemblyai.com/v2";

/// `AssemblyAI` STT provider
///
/// Transcription is asynchronous on `AssemblyAI`'s side: the media is
/// uploaded, a transcript job is created for the upload URL, and the job is
/// polled until it completes or errors.
pub(crate) struct AssemblyAiProvider {
    client: Client,
    base_url: String,
    api_key: SecretString,
    name: String,
    language: Option<String>,
    poll_interval: Duration,
    poll_timeout: Option<Duration>,
    request_timeout: Duration,
}

/// Provider settings beyond credentials
pub(crate) struct ProviderSettings {
    pub language: Option<String>,
    pub poll_interval: Duration,
    pub poll_timeout: Option<Duration>,
    /// Base deadline per request, extended for uploads by their size
    pub request_timeout: Duration,
}

impl AssemblyAiProvider {
    pub fn new(name: String, api_key: SecretString, base_url: Option<String>, settings: ProviderSettings) -> Self {
        let client = dubber_core::http_client();
        let base_url = base_url.unwrap_or_else(|| DEFAULT_ASSEMBLYAI_API_URL.to_string());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            name,
            language: settings.language,
            poll_interval: settings.poll_interval,
            poll_timeout: settings.poll_timeout,
            request_timeout: settings.request_timeout,
        }
    }

    /// Stream the media file to the `AssemblyAI` upload endpoint
    ///
    /// The file handle lives only for the duration of the upload.
    async fn upload(&self, request: &TranscriptionRequest) -> crate::error::Result<String> {
        let file = tokio::fs::File::open(&request.path).await?;
        let length = file.metadata().await?.len();

        tracing::debug!(
            "AssemblyAI upload: {} bytes, filename={}",
            length,
            request.filename,
        );

        let response = self
            .client
            .post(format!("{}/upload", self.base_url))
            .header("Authorization", self.api_key.expose_secret())
            .header("Content-Type", "application/octet-stream")
            .timeout(dubber_core::transfer_timeout(self.request_timeout, length))
            .body(reqwest::Body::wrap_stream(ReaderStream::new(file)))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("AssemblyAI upload failed: {e}");
                SttError::ConnectionError(format!("Failed to upload media to AssemblyAI: {e}"))
            })?;

        let upload: UploadResponse = parse_response(response, "upload").await?;

        Ok(upload.upload_url)
    }

    async fn create_transcript(&self, audio_url: &str) -> crate::error::Result<Transcript> {
        let body = CreateTranscriptRequest {
            audio_url,
            language_code: self.language.as_deref(),
        };

        let response = self
            .client
            .post(format!("{}/transcript", self.base_url))
            .header("Authorization", self.api_key.expose_secret())
            .timeout(self.request_timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("AssemblyAI transcript request failed: {e}");
                SttError::ConnectionError(format!("Failed to create AssemblyAI transcript: {e}"))
            })?;

        parse_response(response, "transcript").await
    }

    async fn fetch_transcript(&self, id: &str) -> crate::error::Result<Transcript> {
        let response = self
            .client
            .get(format!("{}/transcript/{id}", self.base_url))
            .header("Authorization", self.api_key.expose_secret())
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("AssemblyAI status request failed: {e}");
                SttError::ConnectionError(format!("Failed to fetch AssemblyAI transcript: {e}"))
            })?;

        parse_response(response, "transcript status").await
    }
}

async fn parse_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
    what: &str,
) -> crate::error::Result<T> {
    let status = response.status();

    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

        tracing::error!("AssemblyAI {what} error ({status}): {error_text}");

        return Err(SttError::from_status(status, error_text));
    }

    response.json().await.map_err(|e| {
        tracing::error!("Failed to parse AssemblyAI {what} response: {e}");
        SttError::InvalidResponse(format!("AssemblyAI {what}: {e}"))
    })
}

#[derive(Deserialize)]
struct UploadResponse {
    upload_url: String,
}

#[derive(Serialize)]
struct CreateTranscriptRequest<'a> {
    audio_url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    language_code: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct Transcript {
    id: String,
    status: TranscriptStatus,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum TranscriptStatus {
    Queued,
    Processing,
    Completed,
    Error,
}

#[async_trait]
impl SttProvider for AssemblyAiProvider {
    async fn transcribe(&self, request: &TranscriptionRequest) -> crate::error::Result<TranscriptionResponse> {
        let audio_url = self.upload(request).await?;
        let mut transcript = self.create_transcript(&audio_url).await?;
        let started = Instant::now();

        tracing::debug!(transcript_id = %transcript.id, "AssemblyAI transcript created");

        loop {
            match transcript.status {
                TranscriptStatus::Completed => {
                    tracing::debug!(transcript_id = %transcript.id, "AssemblyAI transcription complete");
                    return Ok(TranscriptionResponse {
                        text: transcript.text.unwrap_or_default(),
                    });
                }
                TranscriptStatus::Error => {
                    let message = transcript
                        .error
                        .unwrap_or_else(|| "Transcription failed without an error message".to_string());

                    tracing::warn!(transcript_id = %transcript.id, "AssemblyAI transcription failed: {message}");

                    return Err(SttError::TranscriptionFailed(message));
                }
                TranscriptStatus::Queued | TranscriptStatus::Processing => {}
            }

            if let Some(timeout) = self.poll_timeout
                && started.elapsed() >= timeout
            {
                return Err(SttError::Timeout(timeout));
            }

            tokio::time::sleep(self.poll_interval).await;
            transcript = self.fetch_transcript(&transcript.id).await?;
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
