#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod audio;
mod cors;
mod error;
mod health;
mod pipeline;
mod process;
mod storage;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, extract::DefaultBodyLimit, routing};
use dubber_config::Config;
use tower_http::trace::TraceLayer;

pub use error::ServerError;
pub use pipeline::DubbingResult;

use pipeline::Pipeline;
use storage::{AudioStore, UploadStore};

/// Shared state handed to every handler
pub(crate) struct AppState {
    pub(crate) uploads: UploadStore,
    pub(crate) pipeline: Pipeline,
}

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration
    ///
    /// Creates the upload and audio directories when they are missing.
    ///
    /// # Errors
    ///
    /// Returns an error if a provider fails to initialize or a storage
    /// directory cannot be created
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let listen_address = config.server.listen_address();

        let stt_state = stt::build_server(&config)?;
        let translation_state = translation::build_server(&config)?;
        let tts_state = tts::build_server(&config)?;

        for dir in [&config.storage.uploads_dir, &config.storage.audio_dir] {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| anyhow::anyhow!("failed to create directory {}: {e}", dir.display()))?;
        }

        let state = Arc::new(AppState {
            uploads: UploadStore::new(config.storage.uploads_dir.clone(), config.storage.max_upload_bytes),
            pipeline: Pipeline {
                stt: stt_state,
                translation: translation_state,
                tts: tts_state,
                audio: AudioStore::new(config.storage.audio_dir.clone()),
                source_language: config.pipeline.source_language.clone(),
                target_language: config.pipeline.target_language.clone(),
                public_base_url: config.server.public_base_url(),
            },
        });

        let mut app = Router::new()
            .route(
                "/process-video",
                routing::post(process::process_video).layer(DefaultBodyLimit::max(config.storage.max_upload_bytes)),
            )
            .route("/audio/{filename}", routing::get(audio::download_audio))
            .with_state(state);

        // Health check
        if config.server.health.enabled {
            app = app.route(&config.server.health.path, routing::get(health::health_handler));
        }

        // Tracing
        app = app.layer(TraceLayer::new_for_http());

        // CORS
        if let Some(ref cors_config) = config.server.cors {
            app = app.layer(cors::cors_layer(cors_config));
        }

        tracing::debug!(
            uploads_dir = %config.storage.uploads_dir.display(),
            audio_dir = %config.storage.audio_dir.display(),
            target_language = %config.pipeline.target_language,
            "server assembled"
        );

        Ok(Self {
            router: app,
            listen_address,
        })
    }

    /// Get the configured listen address
    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}
