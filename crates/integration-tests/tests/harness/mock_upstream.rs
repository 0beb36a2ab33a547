//! Mock upstream server for integration tests
//!
//! Implements just enough of the `AssemblyAI`, Google web translate, and Google
//! Translate TTS endpoints to drive the dubbing pipeline with canned results.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use bytes::Bytes;
use tokio_util::sync::CancellationToken;

/// Canned results the mock hands back
#[derive(Debug, Clone)]
pub struct Behavior {
    /// Text of a completed transcript
    pub transcript: String,
    /// When set, the transcript ends in `error` with this message
    pub transcription_error: Option<String>,
    /// Translation returned for every chunk
    pub translation: String,
    /// MP3 bytes returned for every speech chunk
    pub audio: Vec<u8>,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            transcript: "Hello world.".to_owned(),
            transcription_error: None,
            translation: "வணக்கம் உலகம்.".to_owned(),
            audio: b"ID3\x04\x00fake-mp3-frames".to_vec(),
        }
    }
}

/// Mock upstream that counts every call it receives
pub struct MockUpstream {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

struct MockState {
    behavior: Behavior,
    upload_count: AtomicU32,
    transcript_count: AtomicU32,
    translate_count: AtomicU32,
    tts_count: AtomicU32,
}

impl MockUpstream {
    /// Start a mock that completes every step successfully
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_with(Behavior::default()).await
    }

    /// Start a mock whose transcripts fail with `message`
    pub async fn start_failing_transcription(message: &str) -> anyhow::Result<Self> {
        Self::start_with(Behavior {
            transcription_error: Some(message.to_owned()),
            ..Behavior::default()
        })
        .await
    }

    pub async fn start_with(behavior: Behavior) -> anyhow::Result<Self> {
        let state = Arc::new(MockState {
            behavior,
            upload_count: AtomicU32::new(0),
            transcript_count: AtomicU32::new(0),
            translate_count: AtomicU32::new(0),
            tts_count: AtomicU32::new(0),
        });

        let app = Router::new()
            .route("/v2/upload", routing::post(handle_upload))
            .route("/v2/transcript", routing::post(handle_create_transcript))
            .route("/v2/transcript/{id}", routing::get(handle_get_transcript))
            .route("/translate_a/single", routing::get(handle_translate))
            .route("/translate_tts", routing::get(handle_tts))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL for configuring the mock as every provider
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn behavior(&self) -> &Behavior {
        &self.state.behavior
    }

    /// Media uploads received
    pub fn upload_count(&self) -> u32 {
        self.state.upload_count.load(Ordering::Relaxed)
    }

    /// Transcript creations received
    pub fn transcript_count(&self) -> u32 {
        self.state.transcript_count.load(Ordering::Relaxed)
    }

    /// Translation requests received
    pub fn translate_count(&self) -> u32 {
        self.state.translate_count.load(Ordering::Relaxed)
    }

    /// Speech requests received
    pub fn tts_count(&self) -> u32 {
        self.state.tts_count.load(Ordering::Relaxed)
    }

    /// Calls made to any upstream endpoint
    pub fn total_calls(&self) -> u32 {
        self.upload_count() + self.transcript_count() + self.translate_count() + self.tts_count()
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_upload(State(state): State<Arc<MockState>>, headers: HeaderMap, body: Bytes) -> Response {
    state.upload_count.fetch_add(1, Ordering::Relaxed);

    if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some("aai-test") {
        return (StatusCode::UNAUTHORIZED, "Authentication error, API token missing/invalid").into_response();
    }

    Json(serde_json::json!({ "upload_url": format!("https://cdn.mock/upload/{}", body.len()) })).into_response()
}

async fn handle_create_transcript(State(state): State<Arc<MockState>>) -> Json<serde_json::Value> {
    state.transcript_count.fetch_add(1, Ordering::Relaxed);
    Json(serde_json::json!({ "id": "mock-transcript", "status": "queued" }))
}

async fn handle_get_transcript(State(state): State<Arc<MockState>>, Path(id): Path<String>) -> Json<serde_json::Value> {
    match &state.behavior.transcription_error {
        Some(message) => Json(serde_json::json!({ "id": id, "status": "error", "error": message })),
        None => Json(serde_json::json!({
            "id": id,
            "status": "completed",
            "text": state.behavior.transcript,
        })),
    }
}

async fn handle_translate(
    State(state): State<Arc<MockState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<serde_json::Value> {
    state.translate_count.fetch_add(1, Ordering::Relaxed);

    let source = params.get("q").cloned().unwrap_or_default();
    let translated = state.behavior.translation.clone();

    Json(serde_json::json!([[[translated, source, null, null, 10]], null, "en"]))
}

async fn handle_tts(State(state): State<Arc<MockState>>) -> Response {
    state.tts_count.fetch_add(1, Ordering::Relaxed);

    ([("content-type", "audio/mpeg")], state.behavior.audio.clone()).into_response()
}
