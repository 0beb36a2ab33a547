use indexmap::IndexMap;
use secrecy::SecretString;
use serde::Deserialize;

/// Top-level STT configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SttConfig {
    /// STT provider configurations keyed by name
    #[serde(default)]
    pub providers: IndexMap<String, SttProviderConfig>,
}

/// Configuration for a single STT provider
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SttProviderConfig {
    /// Provider type
    #[serde(rename = "type")]
    pub provider_type: SttProviderType,
    /// API key
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Base URL override
    #[serde(default)]
    pub base_url: Option<String>,
    /// Spoken language hint (e.g. "en")
    #[serde(default)]
    pub language: Option<String>,
    /// Model identifier, for providers that take one
    #[serde(default)]
    pub model: Option<String>,
    /// Delay between transcript status checks (e.g. "3s")
    #[serde(default = "default_poll_interval")]
    pub poll_interval: String,
    /// Give up waiting on a transcript after this long (unbounded when absent)
    #[serde(default)]
    pub poll_timeout: Option<String>,
    /// Deadline for one provider request; media uploads get extra time per byte
    #[serde(default = "default_request_timeout")]
    pub request_timeout: String,
}

/// Supported STT providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SttProviderType {
    /// `AssemblyAI` upload + poll API
    Assemblyai,
    /// `OpenAI` Whisper
    Whisper,
}

impl SttProviderType {
    pub const fn requires_api_key(self) -> bool {
        match self {
            Self::Assemblyai | Self::Whisper => true,
        }
    }
}

fn default_poll_interval() -> String {
    "3s".to_string()
}

fn default_request_timeout() -> String {
    "120s".to_string()
}
