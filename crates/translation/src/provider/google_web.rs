use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::error::TranslationError;

use super::{TranslatedChunk, TranslationProvider};

const DEFAULT_GOOGLE_WEB_URL: &str = "https://translate.googleapis.com";

/// Keyless Google Translate provider
///
/// Uses the `gtx` client endpoint that backs the translate.google.com widget.
pub(crate) struct GoogleWebProvider {
    client: Client,
    base_url: String,
    name: String,
    max_chars: usize,
}

impl GoogleWebProvider {
    pub fn new(name: String, base_url: Option<String>, max_chars: usize) -> Self {
        let client = dubber_core::http_client();
        let base_url = base_url.unwrap_or_else(|| DEFAULT_GOOGLE_WEB_URL.to_string());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            name,
            max_chars,
        }
    }
}

/// Extract the translation from a `gtx` response
///
/// The body is a nested array: element 0 lists translated segments, each of
/// which holds the translated text at index 0. Element 2 is the detected
/// source language.
fn parse_gtx(body: &Value) -> Option<TranslatedChunk> {
    let segments = body.get(0)?.as_array()?;

    let text = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect::<String>();

    let detected_source = body.get(2).and_then(Value::as_str).map(str::to_owned);

    Some(TranslatedChunk { text, detected_source })
}

#[async_trait]
impl TranslationProvider for GoogleWebProvider {
    async fn translate_chunk(&self, text: &str, source: &str, target: &str) -> crate::error::Result<TranslatedChunk> {
        let url = format!("{}/translate_a/single", self.base_url);

        tracing::debug!("Google web translation request: {source} -> {target}, {} chars", text.chars().count());

        let response = self
            .client
            .get(&url)
            .query(&[
                ("client", "gtx"),
                ("sl", source),
                ("tl", target),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Google web translation request failed: {e}");
                TranslationError::ConnectionError(format!("Failed to send request to Google Translate: {e}"))
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

            tracing::error!("Google web translation error ({status}): {error_text}");

            return Err(TranslationError::from_status(status, error_text));
        }

        let body: Value = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Google web translation response: {e}");
            TranslationError::InvalidResponse(e.to_string())
        })?;

        parse_gtx(&body).ok_or_else(|| TranslationError::InvalidResponse("missing translated segments".to_string()))
    }

    fn max_chars(&self) -> usize {
        self.max_chars
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn segments_are_concatenated() {
        let body = json!([
            [
                ["வணக்கம். ", "Hello. ", null, null, 10],
                ["நீங்கள் எப்படி இருக்கிறீர்கள்?", "How are you?", null, null, 10]
            ],
            null,
            "en"
        ]);

        let chunk = parse_gtx(&body).unwrap();
        assert_eq!(chunk.text, "வணக்கம். நீங்கள் எப்படி இருக்கிறீர்கள்?");
        assert_eq!(chunk.detected_source.as_deref(), Some("en"));
    }

    #[test]
    fn transliteration_rows_are_skipped() {
        // Rows without a leading string carry romanization, not translation
        let body = json!([[["Bonjour", "Hello", null, null, 10], [null, null, "bonjour"]], null, "en"]);

        assert_eq!(parse_gtx(&body).unwrap().text, "Bonjour");
    }

    #[test]
    fn unexpected_shape_is_rejected() {
        assert!(parse_gtx(&json!({ "error": "nope" })).is_none());
    }
}
