use dubber_config::TranslationProviderType;

use crate::{
    error::TranslationError,
    provider::{TranslationProvider, google_cloud::GoogleCloudProvider, google_web::GoogleWebProvider},
    types::{TranslationRequest, TranslationResponse},
};

/// Translation server that routes requests to the configured provider
pub struct Server {
    providers: Vec<Box<dyn TranslationProvider>>,
    selected: Option<String>,
}

impl Server {
    /// Translate text with the selected provider
    ///
    /// Text within the provider's limit is sent as is and its translation
    /// returned unchanged. Longer text is split at sentence boundaries,
    /// translated chunk by chunk in order, and rejoined with single spaces.
    /// Blank input is returned as an empty translation without a provider call.
    pub async fn translate(&self, request: &TranslationRequest) -> crate::error::Result<TranslationResponse> {
        let provider = self.provider()?;
        let chunks = dubber_core::text::split_text(&request.text, provider.max_chars());

        tracing::debug!(
            provider = provider.name(),
            chunks = chunks.len(),
            "translating {} -> {}",
            request.source,
            request.target,
        );

        let mut translated = Vec::with_capacity(chunks.len());
        let mut detected_source = None;

        for chunk in &chunks {
            let result = provider
                .translate_chunk(chunk, &request.source, &request.target)
                .await?;

            if detected_source.is_none() {
                detected_source = result.detected_source;
            }

            translated.push(result.text);
        }

        let text = if translated.len() == 1 {
            translated.swap_remove(0)
        } else {
            translated.iter().map(String::as_str).map(str::trim).collect::<Vec<_>>().join(" ")
        };

        Ok(TranslationResponse { text, detected_source })
    }

    fn provider(&self) -> crate::error::Result<&dyn TranslationProvider> {
        let provider = match self.selected.as_deref() {
            Some(name) => self
                .providers
                .iter()
                .find(|p| p.name() == name)
                .ok_or_else(|| TranslationError::ProviderNotFound(name.to_string()))?,
            None => self
                .providers
                .first()
                .ok_or_else(|| TranslationError::ProviderNotFound("No translation providers configured".to_string()))?,
        };

        Ok(provider.as_ref())
    }
}

/// Builder for constructing the translation server from configuration
pub struct TranslationServerBuilder<'a> {
    config: &'a dubber_config::Config,
}

impl<'a> TranslationServerBuilder<'a> {
    pub const fn new(config: &'a dubber_config::Config) -> Self {
        Self { config }
    }

    pub fn build(self) -> crate::error::Result<Server> {
        let mut providers: Vec<Box<dyn TranslationProvider>> = Vec::new();

        for (name, provider_config) in &self.config.translation.providers {
            tracing::debug!("Initializing translation provider: {name}");

            let provider: Box<dyn TranslationProvider> = match provider_config.provider_type {
                TranslationProviderType::GoogleWeb => Box::new(GoogleWebProvider::new(
                    name.clone(),
                    provider_config.base_url.clone(),
                    provider_config.max_chars,
                )),
                TranslationProviderType::GoogleCloud => {
                    let api_key = provider_config.api_key.clone().ok_or_else(|| {
                        TranslationError::ConfigError(format!("API key required for translation provider '{name}'"))
                    })?;

                    Box::new(GoogleCloudProvider::new(
                        name.clone(),
                        api_key,
                        provider_config.base_url.clone(),
                        provider_config.max_chars,
                    ))
                }
            };

            providers.push(provider);
        }

        if providers.is_empty() {
            tracing::debug!("No translation providers configured");
        } else {
            tracing::debug!("Translation server initialized with {} provider(s)", providers.len());
        }

        Ok(Server {
            providers,
            selected: self.config.pipeline.translation_provider.clone(),
        })
    }
}
