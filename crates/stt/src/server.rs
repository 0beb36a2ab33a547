use secrecy::SecretString;
use dubber_config::{SttProviderConfig, SttProviderType};

use crate::{
    error::SttError,
    provider::{
        SttProvider,
        assemblyai::{AssemblyAiProvider, ProviderSettings},
        whisper::WhisperProvider,
    },
    types::{TranscriptionRequest, TranscriptionResponse},
};

/// STT server that routes requests to the configured provider
pub struct Server {
    providers: Vec<Box<dyn SttProvider>>,
    selected: Option<String>,
}

impl Server {
    /// Transcribe a media file with the selected provider
    ///
    /// Uses the provider named by `pipeline.stt_provider`, or the first
    /// configured provider when no name is set.
    pub async fn transcribe(&self, request: &TranscriptionRequest) -> crate::error::Result<TranscriptionResponse> {
        let provider = match self.selected.as_deref() {
            Some(name) => self
                .providers
                .iter()
                .find(|p| p.name() == name)
                .ok_or_else(|| SttError::ProviderNotFound(name.to_string()))?,
            None => self
                .providers
                .first()
                .ok_or_else(|| SttError::ProviderNotFound("No STT providers configured".to_string()))?,
        };

        tracing::debug!(provider = provider.name(), filename = %request.filename, "transcribing media");

        provider.transcribe(request).await
    }
}

/// Builder for constructing the STT server from configuration
pub struct SttServerBuilder<'a> {
    config: &'a dubber_config::Config,
}

impl<'a> SttServerBuilder<'a> {
    pub const fn new(config: &'a dubber_config::Config) -> Self {
        Self { config }
    }

    pub fn build(self) -> crate::error::Result<Server> {
        let mut providers: Vec<Box<dyn SttProvider>> = Vec::new();

        for (name, provider_config) in &self.config.stt.providers {
            tracing::debug!("Initializing STT provider: {name}");

            let provider: Box<dyn SttProvider> = match provider_config.provider_type {
                SttProviderType::Assemblyai => {
                    let api_key = resolve_api_key(name, provider_config)?;

                    Box::new(AssemblyAiProvider::new(
                        name.clone(),
                        api_key,
                        provider_config.base_url.clone(),
                        provider_settings(name, provider_config)?,
                    ))
                }
                SttProviderType::Whisper => {
                    let api_key = resolve_api_key(name, provider_config)?;

                    Box::new(WhisperProvider::new(
                        name.clone(),
                        api_key,
                        provider_config.base_url.clone(),
                        provider_config.model.clone(),
                        provider_settings(name, provider_config)?,
                    ))
                }
            };

            providers.push(provider);
        }

        if providers.is_empty() {
            tracing::debug!("No STT providers configured");
        } else {
            tracing::debug!("STT server initialized with {} provider(s)", providers.len());
        }

        Ok(Server {
            providers,
            selected: self.config.pipeline.stt_provider.clone(),
        })
    }
}

fn resolve_api_key(name: &str, config: &SttProviderConfig) -> crate::error::Result<SecretString> {
    config
        .api_key
        .clone()
        .ok_or_else(|| SttError::ConfigError(format!("API key required for STT provider '{name}'")))
}

fn provider_settings(name: &str, config: &SttProviderConfig) -> crate::error::Result<ProviderSettings> {
    let parse = |value: &str, field: &str| {
        duration_str::parse(value)
            .map_err(|e| SttError::ConfigError(format!("invalid {field} for STT provider '{name}': {e}")))
    };

    Ok(ProviderSettings {
        language: config.language.clone(),
        poll_interval: parse(&config.poll_interval, "poll_interval")?,
        poll_timeout: config
            .poll_timeout
            .as_deref()
            .map(|timeout| parse(timeout, "poll_timeout"))
            .transpose()?,
        request_timeout: parse(&config.request_timeout, "request_timeout")?,
    })
}
