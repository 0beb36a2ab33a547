use serde::{Deserialize, Serialize};

/// Text to translate between two languages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub text: String,
    /// Source language code, or `auto` to let the provider detect it
    pub source: String,
    /// Target language code (e.g. "ta")
    pub target: String,
}

/// Translated text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationResponse {
    pub text: String,
    /// Source language reported by the provider, when it detected one
    pub detected_source: Option<String>,
}
