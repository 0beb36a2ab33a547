use std::path::Path;

use indexmap::IndexMap;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::from_toml_str(&raw)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing, or validation fails
    pub fn from_toml_str(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if a pipeline stage has no provider, a selected
    /// provider is not configured, or a provider is missing required settings
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_pipeline()?;
        self.validate_storage()?;
        self.validate_stt()?;
        self.validate_translation()?;
        self.validate_tts()?;
        Ok(())
    }

    fn validate_pipeline(&self) -> anyhow::Result<()> {
        if self.pipeline.target_language.trim().is_empty() {
            anyhow::bail!("pipeline.target_language must not be empty");
        }

        if self.pipeline.source_language.trim().is_empty() {
            anyhow::bail!("pipeline.source_language must not be empty");
        }

        check_selection("STT", self.pipeline.stt_provider.as_deref(), &self.stt.providers)?;
        check_selection(
            "translation",
            self.pipeline.translation_provider.as_deref(),
            &self.translation.providers,
        )?;
        check_selection("TTS", self.pipeline.tts_provider.as_deref(), &self.tts.providers)?;

        Ok(())
    }

    fn validate_storage(&self) -> anyhow::Result<()> {
        if self.storage.max_upload_bytes == 0 {
            anyhow::bail!("storage.max_upload_bytes must be greater than 0");
        }

        if self.storage.uploads_dir == self.storage.audio_dir {
            anyhow::bail!("storage.uploads_dir and storage.audio_dir must be different directories");
        }

        Ok(())
    }

    fn validate_stt(&self) -> anyhow::Result<()> {
        for (name, provider) in &self.stt.providers {
            if provider.provider_type.requires_api_key() && provider.api_key.is_none() {
                anyhow::bail!("API key required for STT provider '{name}'");
            }

            duration_str::parse(&provider.poll_interval)
                .map_err(|e| anyhow::anyhow!("invalid poll_interval for STT provider '{name}': {e}"))?;

            duration_str::parse(&provider.request_timeout)
                .map_err(|e| anyhow::anyhow!("invalid request_timeout for STT provider '{name}': {e}"))?;

            if let Some(ref timeout) = provider.poll_timeout {
                duration_str::parse(timeout)
                    .map_err(|e| anyhow::anyhow!("invalid poll_timeout for STT provider '{name}': {e}"))?;
            }
        }

        Ok(())
    }

    fn validate_translation(&self) -> anyhow::Result<()> {
        for (name, provider) in &self.translation.providers {
            if provider.provider_type.requires_api_key() && provider.api_key.is_none() {
                anyhow::bail!("API key required for translation provider '{name}'");
            }

            if provider.max_chars == 0 {
                anyhow::bail!("max_chars for translation provider '{name}' must be greater than 0");
            }
        }

        Ok(())
    }

    fn validate_tts(&self) -> anyhow::Result<()> {
        for (name, provider) in &self.tts.providers {
            if provider.provider_type.requires_api_key() && provider.api_key.is_none() {
                anyhow::bail!("API key required for TTS provider '{name}'");
            }
        }

        Ok(())
    }
}

/// Ensure a stage has providers and that an explicit selection names one of them
fn check_selection<T>(stage: &str, selected: Option<&str>, providers: &IndexMap<String, T>) -> anyhow::Result<()> {
    if providers.is_empty() {
        anyhow::bail!("at least one {stage} provider must be configured");
    }

    if let Some(name) = selected
        && !providers.contains_key(name)
    {
        anyhow::bail!("selected {stage} provider '{name}' is not configured");
    }

    Ok(())
}
