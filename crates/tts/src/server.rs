use secrecy::SecretString;
use dubber_config::{TtsProviderConfig, TtsProviderType};

use crate::{
    error::TtsError,
    provider::{TtsProvider, google_translate::GoogleTranslateProvider, openai_tts::OpenAiTtsProvider},
    types::{SpeechRequest, SpeechResponse},
};

/// TTS server that routes requests to the configured provider
pub struct Server {
    providers: Vec<Box<dyn TtsProvider>>,
    selected: Option<String>,
}

impl Server {
    /// Synthesize text to speech
    ///
    /// Uses the provider named by `pipeline.tts_provider`, or the first
    /// configured provider when no name is set.
    pub async fn synthesize(&self, request: &SpeechRequest) -> crate::error::Result<SpeechResponse> {
        let provider = match self.selected.as_deref() {
            Some(name) => self
                .providers
                .iter()
                .find(|p| p.name() == name)
                .ok_or_else(|| TtsError::ProviderNotFound(name.to_string()))?,
            None => self
                .providers
                .first()
                .ok_or_else(|| TtsError::ProviderNotFound("No TTS providers configured".to_string()))?,
        };

        tracing::debug!(provider = provider.name(), language = %request.language, "synthesizing speech");

        provider.synthesize(request).await
    }
}

/// Builder for constructing the TTS server from configuration
pub struct TtsServerBuilder<'a> {
    config: &'a dubber_config::Config,
}

impl<'a> TtsServerBuilder<'a> {
    pub const fn new(config: &'a dubber_config::Config) -> Self {
        Self { config }
    }

    pub fn build(self) -> crate::error::Result<Server> {
        let mut providers: Vec<Box<dyn TtsProvider>> = Vec::new();

        for (name, provider_config) in &self.config.tts.providers {
            tracing::debug!("Initializing TTS provider: {name}");

            let provider: Box<dyn TtsProvider> = match provider_config.provider_type {
                TtsProviderType::GoogleTranslate => Box::new(GoogleTranslateProvider::new(
                    name.clone(),
                    provider_config.base_url.clone(),
                    provider_config.tld.as_deref(),
                )),
                TtsProviderType::OpenaiTts => {
                    let api_key = resolve_api_key(name, provider_config)?;

                    Box::new(OpenAiTtsProvider::new(
                        name.clone(),
                        api_key,
                        provider_config.base_url.clone(),
                        provider_config.model.clone(),
                        provider_config.voice.clone(),
                        provider_config.response_format,
                    ))
                }
            };

            providers.push(provider);
        }

        if providers.is_empty() {
            tracing::debug!("No TTS providers configured");
        } else {
            tracing::debug!("TTS server initialized with {} provider(s)", providers.len());
        }

        Ok(Server {
            providers,
            selected: self.config.pipeline.tts_provider.clone(),
        })
    }
}

fn resolve_api_key(name: &str, config: &TtsProviderConfig) -> crate::error::Result<SecretString> {
    config
        .api_key
        .clone()
        .ok_or_else(|| TtsError::ConfigError(format!("API key required for TTS provider '{name}'")))
}
