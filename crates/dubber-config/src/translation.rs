use indexmap::IndexMap;
use secrecy::SecretString;
use serde::Deserialize;

/// Top-level translation configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TranslationConfig {
    /// Translation provider configurations keyed by name
    #[serde(default)]
    pub providers: IndexMap<String, TranslationProviderConfig>,
}

/// Configuration for a single translation provider
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TranslationProviderConfig {
    /// Provider type
    #[serde(rename = "type")]
    pub provider_type: TranslationProviderType,
    /// API key, required by `google_cloud`
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Base URL override
    #[serde(default)]
    pub base_url: Option<String>,
    /// Longest text sent in one request; longer input is split
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
}

/// Supported translation providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationProviderType {
    /// Keyless Google Translate web endpoint
    GoogleWeb,
    /// Google Cloud Translation v2
    GoogleCloud,
}

impl TranslationProviderType {
    pub const fn requires_api_key(self) -> bool {
        matches!(self, Self::GoogleCloud)
    }
}

#[allow(clippy::missing_const_for_fn)]
fn default_max_chars() -> usize {
    5000
}
