#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

mod error;
mod provider;
mod server;
mod types;

use std::sync::Arc;

pub use error::{Result, TranslationError};
pub use server::{Server, TranslationServerBuilder};
pub use types::{TranslationRequest, TranslationResponse};

/// Build the translation server from configuration
///
/// # Errors
///
/// Returns an error if a provider fails to initialize
pub fn build_server(config: &dubber_config::Config) -> anyhow::Result<Arc<Server>> {
    let server = Arc::new(
        TranslationServerBuilder::new(config)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to initialize translation server: {e}"))?,
    );
    Ok(server)
}
