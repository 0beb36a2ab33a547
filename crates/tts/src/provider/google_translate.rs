use async_trait::async_trait;
use reqwest::Client;

use crate::{
    error::TtsError,
    types::{SpeechRequest, SpeechResponse},
};

use super::TtsProvider;

/// Longest text the speech endpoint accepts per request
const MAX_CHARS: usize = 100;
const DEFAULT_TLD: &str = "com";

/// Keyless Google Translate speech provider
///
/// The endpoint only speaks short snippets, so text is split into chunks and
/// the returned MP3 segments are concatenated into one stream.
pub(crate) struct GoogleTranslateProvider {
    client: Client,
    base_url: String,
    name: String,
}

impl GoogleTranslateProvider {
    pub fn new(name: String, base_url: Option<String>, tld: Option<&str>) -> Self {
        let client = dubber_core::http_client();
        let base_url =
            base_url.unwrap_or_else(|| format!("https://translate.google.{}", tld.unwrap_or(DEFAULT_TLD)));

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            name,
        }
    }

    async fn fetch_segment(&self, text: &str, language: &str, idx: usize, total: usize) -> crate::error::Result<Vec<u8>> {
        let url = format!("{}/translate_tts", self.base_url);
        let total = total.to_string();
        let idx = idx.to_string();
        let textlen = text.chars().count().to_string();

        let response = self
            .client
            .get(&url)
            .header(http::header::REFERER, format!("{}/", self.base_url))
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", language),
                ("q", text),
                ("total", total.as_str()),
                ("idx", idx.as_str()),
                ("textlen", textlen.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Google Translate TTS request failed: {e}");
                TtsError::ConnectionError(format!("Failed to send request to Google Translate TTS: {e}"))
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

            tracing::error!("Google Translate TTS error ({status}): {error_text}");

            return Err(TtsError::from_status(status, error_text));
        }

        let audio = response.bytes().await.map_err(|e| {
            tracing::error!("Failed to read Google Translate TTS response body: {e}");
            TtsError::InvalidResponse(format!("Google Translate TTS body: {e}"))
        })?;

        Ok(audio.to_vec())
    }
}

#[async_trait]
impl TtsProvider for GoogleTranslateProvider {
    async fn synthesize(&self, request: &SpeechRequest) -> crate::error::Result<SpeechResponse> {
        let chunks = dubber_core::text::split_text(&request.input, MAX_CHARS);

        if chunks.is_empty() {
            return Err(TtsError::InvalidRequest("No text to speak".to_string()));
        }

        tracing::debug!(
            "Google Translate TTS request: lang={}, {} chunk(s)",
            request.language,
            chunks.len(),
        );

        let mut audio = Vec::new();

        for (idx, chunk) in chunks.iter().enumerate() {
            let segment = self.fetch_segment(chunk, &request.language, idx, chunks.len()).await?;
            audio.extend_from_slice(&segment);
        }

        tracing::debug!("Google Translate TTS synthesis complete, {} bytes", audio.len());

        Ok(SpeechResponse {
            audio,
            content_type: "audio/mpeg".to_string(),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
