use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::TranslationError;

use super::{TranslatedChunk, TranslationProvider};

const DEFAULT_GOOGLE_CLOUD_URL: &str = "https://translation.googleapis.com";

/// Google Cloud Translation v2 provider
pub(crate) struct GoogleCloudProvider {
    client: Client,
    base_url: String,
    api_key: SecretString,
    name: String,
    max_chars: usize,
}

impl GoogleCloudProvider {
    pub fn new(name: String, api_key: SecretString, base_url: Option<String>, max_chars: usize) -> Self {
        let client = dubber_core::http_client();
        let base_url = base_url.unwrap_or_else(|| DEFAULT_GOOGLE_CLOUD_URL.to_string());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            name,
            max_chars,
        }
    }
}

#[derive(Serialize)]
struct CloudTranslateRequest<'a> {
    q: &'a str,
    target: &'a str,
    format: &'static str,
    /// Omitted for `auto` so the API detects the language
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'a str>,
}

#[derive(Deserialize)]
struct CloudTranslateResponse {
    data: CloudTranslations,
}

#[derive(Deserialize)]
struct CloudTranslations {
    translations: Vec<CloudTranslation>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CloudTranslation {
    translated_text: String,
    #[serde(default)]
    detected_source_language: Option<String>,
}

#[async_trait]
impl TranslationProvider for GoogleCloudProvider {
    async fn translate_chunk(&self, text: &str, source: &str, target: &str) -> crate::error::Result<TranslatedChunk> {
        let url = format!("{}/language/translate/v2", self.base_url);

        tracing::debug!("Google Cloud translation request: {source} -> {target}, {} chars", text.chars().count());

        let body = CloudTranslateRequest {
            q: text,
            target,
            format: "text",
            source: (source != "auto").then_some(source),
        };

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.expose_secret())])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Google Cloud translation request failed: {e}");
                TranslationError::ConnectionError(format!("Failed to send request to Google Cloud Translation: {e}"))
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

            tracing::error!("Google Cloud translation error ({status}): {error_text}");

            return Err(TranslationError::from_status(status, error_text));
        }

        let result: CloudTranslateResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Google Cloud translation response: {e}");
            TranslationError::InvalidResponse(e.to_string())
        })?;

        let mut translations = result.data.translations.into_iter();
        let first = translations
            .next()
            .ok_or_else(|| TranslationError::InvalidResponse("no translations returned".to_string()))?;

        let mut text = first.translated_text;
        for extra in translations {
            text.push_str(&extra.translated_text);
        }

        Ok(TranslatedChunk {
            text,
            detected_source: first.detected_source_language,
        })
    }

    fn max_chars(&self) -> usize {
        self.max_chars
    }

    fn name(&self) -> &str {
        &self.name
    }
}
