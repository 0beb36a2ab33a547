#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod error;
mod provider;
mod server;
mod types;

use std::sync::Arc;

pub use error::{Result, TtsError};
pub use server::{Server, TtsServerBuilder};
pub use types::{SpeechRequest, SpeechResponse};

/// Build the TTS server from configuration
pub fn build_server(config: &dubber_config::Config) -> anyhow::Result<Arc<Server>> {
    let server = Arc::new(
        TtsServerBuilder::new(config)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to initialize TTS server: {e}"))?,
    );
    Ok(server)
}
