#![allow(clippy::must_use_candidate)]

pub mod cors;
mod env;
pub mod health;
mod loader;
pub mod pipeline;
pub mod server;
pub mod storage;
pub mod stt;
pub mod telemetry;
pub mod translation;
pub mod tts;

use serde::Deserialize;

pub use cors::*;
pub use health::*;
pub use pipeline::*;
pub use server::*;
pub use storage::*;
pub use stt::*;
pub use telemetry::*;
pub use translation::*;
pub use tts::*;

/// Top-level dubbing gateway configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Upload and audio directories
    #[serde(default)]
    pub storage: StorageConfig,
    /// Languages and provider selection
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// STT provider configuration
    #[serde(default)]
    pub stt: SttConfig,
    /// Translation provider configuration
    #[serde(default)]
    pub translation: TranslationConfig,
    /// TTS provider configuration
    #[serde(default)]
    pub tts: TtsConfig,
    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}
