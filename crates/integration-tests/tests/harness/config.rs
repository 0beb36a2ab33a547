//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use dubber_config::{
    AudioFormat, Config, CorsConfig, HealthConfig, ServerConfig, StorageConfig, SttProviderConfig, SttProviderType,
    TranslationProviderConfig, TranslationProviderType, TtsProviderConfig, TtsProviderType,
};
use secrecy::SecretString;

/// Public URL the test server advertises in `audio_url`
pub const PUBLIC_URL: &str = "http://dub.test";

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a builder with every pipeline stage pointed at the mock upstream
    ///
    /// Upload and audio directories are created under `storage_root`.
    pub fn new(upstream_url: &str, storage_root: &Path) -> Self {
        let mut config = Config {
            server: ServerConfig {
                listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                public_url: Some(PUBLIC_URL.parse().expect("valid URL")),
                health: HealthConfig {
                    enabled: true,
                    ..HealthConfig::default()
                },
                ..ServerConfig::default()
            },
            storage: StorageConfig {
                uploads_dir: storage_root.join("uploads"),
                audio_dir: storage_root.join("audio"),
                ..StorageConfig::default()
            },
            ..Config::default()
        };

        config.stt.providers.insert(
            "assembly".to_owned(),
            SttProviderConfig {
                provider_type: SttProviderType::Assemblyai,
                api_key: Some(SecretString::from("aai-test")),
                base_url: Some(format!("{upstream_url}/v2")),
                language: None,
                model: None,
                poll_interval: "10ms".to_owned(),
                poll_timeout: Some("5s".to_owned()),
                request_timeout: "10s".to_owned(),
            },
        );

        config.translation.providers.insert(
            "google".to_owned(),
            TranslationProviderConfig {
                provider_type: TranslationProviderType::GoogleWeb,
                api_key: None,
                base_url: Some(upstream_url.to_owned()),
                max_chars: 5000,
            },
        );

        config.tts.providers.insert(
            "google".to_owned(),
            TtsProviderConfig {
                provider_type: TtsProviderType::GoogleTranslate,
                api_key: None,
                base_url: Some(upstream_url.to_owned()),
                model: None,
                voice: None,
                tld: None,
                response_format: AudioFormat::Mp3,
            },
        );

        Self { config }
    }

    /// Set CORS configuration
    pub fn with_cors(mut self, config: CorsConfig) -> Self {
        self.config.server.cors = Some(config);
        self
    }

    /// Cap the accepted upload size
    pub fn with_max_upload_bytes(mut self, limit: usize) -> Self {
        self.config.storage.max_upload_bytes = limit;
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config.validate().expect("test config must be valid");
        self.config
    }
}

/// Upload directory used by a config built from `storage_root`
pub fn uploads_dir(storage_root: &Path) -> PathBuf {
    storage_root.join("uploads")
}

/// Number of entries left in a directory
pub fn entries(dir: &Path) -> usize {
    std::fs::read_dir(dir).map_or(0, Iterator::count)
}

/// Entry count once background removal of dropped uploads has had time to run
pub async fn entries_after_cleanup(dir: &Path) -> usize {
    for _ in 0..50 {
        if entries(dir) == 0 {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }

    entries(dir)
}
