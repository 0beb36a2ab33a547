use indexmap::IndexMap;
use secrecy::SecretString;
use serde::Deserialize;

/// Top-level TTS configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TtsConfig {
    /// TTS provider configurations keyed by name
    #[serde(default)]
    pub providers: IndexMap<String, TtsProviderConfig>,
}

/// Configuration for a single TTS provider
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TtsProviderConfig {
    /// Provider type
    #[serde(rename = "type")]
    pub provider_type: TtsProviderType,
    /// API key
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Base URL override
    #[serde(default)]
    pub base_url: Option<String>,
    /// Model identifier (e.g. "tts-1")
    #[serde(default)]
    pub model: Option<String>,
    /// Voice identifier (e.g. "alloy")
    #[serde(default)]
    pub voice: Option<String>,
    /// Regional host for Google Translate voices (e.g. "com", "co.in")
    #[serde(default)]
    pub tld: Option<String>,
    /// Audio encoding requested from providers that offer a choice
    #[serde(default)]
    pub response_format: AudioFormat,
}

/// Supported TTS providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TtsProviderType {
    /// Keyless Google Translate speech endpoint
    GoogleTranslate,
    /// `OpenAI` TTS
    OpenaiTts,
}

impl TtsProviderType {
    pub const fn requires_api_key(self) -> bool {
        matches!(self, Self::OpenaiTts)
    }
}

/// Encoding of synthesized audio
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    #[default]
    Mp3,
    Opus,
    Aac,
    Flac,
    Wav,
}

impl AudioFormat {
    /// Name used in provider requests
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Opus => "opus",
            Self::Aac => "aac",
            Self::Flac => "flac",
            Self::Wav => "wav",
        }
    }

    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Opus => "audio/opus",
            Self::Aac => "audio/aac",
            Self::Flac => "audio/flac",
            Self::Wav => "audio/wav",
        }
    }
}
