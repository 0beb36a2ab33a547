use serde::Deserialize;

/// Language and provider selection for the dubbing pipeline
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Source language passed to the translator (`auto` detects it)
    #[serde(default = "default_source_language")]
    pub source_language: String,
    /// Language the transcript is translated and spoken in
    #[serde(default = "default_target_language")]
    pub target_language: String,
    /// Named STT provider, the first configured one when absent
    #[serde(default)]
    pub stt_provider: Option<String>,
    /// Named translation provider, the first configured one when absent
    #[serde(default)]
    pub translation_provider: Option<String>,
    /// Named TTS provider, the first configured one when absent
    #[serde(default)]
    pub tts_provider: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_language: default_source_language(),
            target_language: default_target_language(),
            stt_provider: None,
            translation_provider: None,
            tts_provider: None,
        }
    }
}

fn default_source_language() -> String {
    "auto".to_string()
}

fn default_target_language() -> String {
    "ta".to_string()
}
