use async_trait::async_trait;
use dubber_config::AudioFormat;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};

use crate::{
    error::TtsError,
    types::{SpeechRequest, SpeechResponse},
};

use super::TtsProvider;

const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "tts-1";
const DEFAULT_VOICE: &str = "alloy";
/// Input limit of the speech endpoint
const MAX_CHARS: usize = 4096;

/// `OpenAI` TTS provider
///
/// Voices are multilingual, so the request language is not sent. Text over
/// the input limit is spoken in several requests whose audio is appended, which
/// only plays back cleanly for frame-based formats such as MP3 and AAC.
pub(crate) struct OpenAiTtsProvider {
    client: Client,
    base_url: String,
    api_key: SecretString,
    name: String,
    model: String,
    voice: String,
    format: AudioFormat,
}

impl OpenAiTtsProvider {
    pub fn new(
        name: String,
        api_key: SecretString,
        base_url: Option<String>,
        model: Option<String>,
        voice: Option<String>,
        format: AudioFormat,
    ) -> Self {
        let client = dubber_core::http_client();
        let base_url = base_url.unwrap_or_else(|| DEFAULT_OPENAI_API_URL.to_string());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            name,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            voice: voice.unwrap_or_else(|| DEFAULT_VOICE.to_string()),
            format,
        }
    }

    async fn speak(&self, input: &str) -> crate::error::Result<Vec<u8>> {
        let url = format!("{}/audio/speech", self.base_url);

        let body = OpenAiTtsRequest {
            model: &self.model,
            input,
            voice: &self.voice,
            response_format: self.format.as_str(),
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key.expose_secret()))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("OpenAI TTS request failed: {e}");
                TtsError::ConnectionError(format!("Failed to send request to OpenAI TTS: {e}"))
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

            tracing::error!("OpenAI TTS API error ({status}): {error_text}");

            return Err(TtsError::from_status(status, error_text));
        }

        let audio = response.bytes().await.map_err(|e| {
            tracing::error!("Failed to read OpenAI TTS response body: {e}");
            TtsError::InvalidResponse(format!("OpenAI TTS body: {e}"))
        })?;

        Ok(audio.to_vec())
    }
}

#[derive(serde::Serialize)]
struct OpenAiTtsRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
}

#[async_trait]
impl TtsProvider for OpenAiTtsProvider {
    async fn synthesize(&self, request: &SpeechRequest) -> crate::error::Result<SpeechResponse> {
        let chunks = dubber_core::text::split_text(&request.input, MAX_CHARS);

        if chunks.is_empty() {
            return Err(TtsError::InvalidRequest("No text to speak".to_string()));
        }

        tracing::debug!(
            "OpenAI TTS request: model={}, voice={}, format={}, {} chunk(s)",
            self.model,
            self.voice,
            self.format.as_str(),
            chunks.len(),
        );

        let mut audio = Vec::new();
        for chunk in &chunks {
            audio.extend_from_slice(&self.speak(chunk).await?);
        }

        tracing::debug!("OpenAI TTS synthesis complete, {} bytes", audio.len());

        Ok(SpeechResponse {
            audio,
            content_type: self.format.content_type().to_string(),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
