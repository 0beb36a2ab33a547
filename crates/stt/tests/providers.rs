//! Provider tests against a local mock of the upstream APIs

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::{Json, Router, routing};
use bytes::Bytes;
use stt::{SttError, TranscriptionRequest};
use tokio_util::sync::CancellationToken;

struct MockState {
    uploaded: std::sync::Mutex<Vec<u8>>,
    polls: AtomicU32,
    /// Poll responses report `processing` until this many polls have happened
    ready_after: u32,
    failure: Option<String>,
    /// Time the upload endpoint holds a request after receiving the body
    upload_delay: Duration,
}

struct Mock {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

impl Mock {
    async fn start(ready_after: u32, failure: Option<&str>) -> Self {
        Self::spawn(MockState {
            uploaded: std::sync::Mutex::new(Vec::new()),
            polls: AtomicU32::new(0),
            ready_after,
            failure: failure.map(str::to_owned),
            upload_delay: Duration::ZERO,
        })
        .await
    }

    async fn start_slow_upload(upload_delay: Duration) -> Self {
        Self::spawn(MockState {
            uploaded: std::sync::Mutex::new(Vec::new()),
            polls: AtomicU32::new(0),
            ready_after: 1,
            failure: None,
            upload_delay,
        })
        .await
    }

    async fn spawn(state: MockState) -> Self {
        let state = Arc::new(state);

        let app = Router::new()
            .route("/v2/upload", routing::post(upload))
            .route("/v2/transcript", routing::post(create_transcript))
            .route("/v2/transcript/{id}", routing::get(get_transcript))
            .route("/v1/audio/transcriptions", routing::post(whisper))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { shutdown_clone.cancelled().await })
                .await
                .ok();
        });

        Self { addr, shutdown, state }
    }

    fn url(&self, prefix: &str) -> String {
        format!("http://{}/{prefix}", self.addr)
    }
}

impl Drop for Mock {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn upload(State(state): State<Arc<MockState>>, headers: HeaderMap, body: Bytes) -> impl IntoResponse {
    if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some("aai-test") {
        return (StatusCode::UNAUTHORIZED, Json(serde_json::json!({ "error": "Authentication error" })));
    }

    *state.uploaded.lock().unwrap() = body.to_vec();
    tokio::time::sleep(state.upload_delay).await;

    (
        StatusCode::OK,
        Json(serde_json::json!({ "upload_url": "https://cdn.mock/upload/1" })),
    )
}

async fn create_transcript(Json(body): Json<serde_json::Value>) -> Json<serde_json::Value> {
    assert_eq!(body["audio_url"], "https://cdn.mock/upload/1");
    Json(serde_json::json!({ "id": "t-1", "status": "queued" }))
}

async fn get_transcript(State(state): State<Arc<MockState>>, Path(id): Path<String>) -> Json<serde_json::Value> {
    let polls = state.polls.fetch_add(1, Ordering::Relaxed) + 1;

    if polls < state.ready_after {
        return Json(serde_json::json!({ "id": id, "status": "processing" }));
    }

    match &state.failure {
        Some(message) => Json(serde_json::json!({ "id": id, "status": "error", "error": message })),
        None => Json(serde_json::json!({ "id": id, "status": "completed", "text": "Hello from the mock." })),
    }
}

async fn whisper(mut multipart: Multipart) -> Json<serde_json::Value> {
    let mut model = None;
    let mut file_len = 0;

    while let Some(field) = multipart.next_field().await.unwrap() {
        match field.name() {
            Some("model") => model = Some(field.text().await.unwrap()),
            Some("file") => file_len = field.bytes().await.unwrap().len(),
            _ => {}
        }
    }

    Json(serde_json::json!({ "text": format!("{} heard {file_len} bytes", model.unwrap_or_default()) }))
}

fn config(mock: &Mock, stt_section: &str) -> dubber_config::Config {
    let raw = format!(
        r#"
        {stt_section}
        base_url = "{}"

        [translation.providers.google]
        type = "google_web"

        [tts.providers.google]
        type = "google_translate"
        "#,
        mock.url(if stt_section.contains("whisper") { "v1" } else { "v2" }),
    );

    dubber_config::Config::from_toml_str(&raw).unwrap()
}

const ASSEMBLYAI: &str = r#"
    [stt.providers.assembly]
    type = "assemblyai"
    api_key = "aai-test"
    poll_interval = "10ms"
"#;

fn media_file(contents: &[u8]) -> (tempfile::NamedTempFile, TranscriptionRequest) {
    let file = tempfile::Builder::new().suffix(".mp4").tempfile().unwrap();
    std::fs::write(file.path(), contents).unwrap();

    let request = TranscriptionRequest {
        path: file.path().to_path_buf(),
        filename: "clip.mp4".to_owned(),
        content_type: "video/mp4".to_owned(),
    };

    (file, request)
}

#[tokio::test]
async fn assemblyai_polls_until_completed() {
    let mock = Mock::start(3, None).await;
    let server = stt::build_server(&config(&mock, ASSEMBLYAI)).unwrap();
    let (_file, request) = media_file(b"fake video bytes");

    let response = server.transcribe(&request).await.unwrap();

    assert_eq!(response.text, "Hello from the mock.");
    assert_eq!(mock.state.polls.load(Ordering::Relaxed), 3);
    assert_eq!(mock.state.uploaded.lock().unwrap().as_slice(), b"fake video bytes");
}

#[tokio::test]
async fn assemblyai_error_message_is_kept_verbatim() {
    let message = "Transcoding failed. File does not appear to contain audio.";
    let mock = Mock::start(1, Some(message)).await;
    let server = stt::build_server(&config(&mock, ASSEMBLYAI)).unwrap();
    let (_file, request) = media_file(b"silence");

    let err = server.transcribe(&request).await.unwrap_err();

    assert!(matches!(err, SttError::TranscriptionFailed(_)));
    assert_eq!(err.to_string(), message);
}

#[tokio::test]
async fn assemblyai_rejected_key_is_authentication_error() {
    let mock = Mock::start(1, None).await;
    let section = ASSEMBLYAI.replace("aai-test", "wrong-key");
    let server = stt::build_server(&config(&mock, &section)).unwrap();
    let (_file, request) = media_file(b"bytes");

    let err = server.transcribe(&request).await.unwrap_err();

    assert!(matches!(err, SttError::AuthenticationFailed(_)));
    assert_eq!(mock.state.polls.load(Ordering::Relaxed), 0);
}

#[tokio::test]
async fn assemblyai_poll_timeout_is_enforced() {
    let mock = Mock::start(u32::MAX, None).await;
    let section = format!("{ASSEMBLYAI}poll_timeout = \"50ms\"\n");
    let server = stt::build_server(&config(&mock, &section)).unwrap();
    let (_file, request) = media_file(b"bytes");

    let err = server.transcribe(&request).await.unwrap_err();

    assert!(matches!(err, SttError::Timeout(_)));
}

#[tokio::test]
async fn upload_deadline_grows_with_media_size() {
    let mock = Mock::start_slow_upload(Duration::from_millis(600)).await;
    let section = format!("{ASSEMBLYAI}request_timeout = \"200ms\"\n");
    let server = stt::build_server(&config(&mock, &section)).unwrap();
    let (_file, request) = media_file(&[7u8; 64 * 1024]);

    let response = server.transcribe(&request).await.unwrap();

    assert_eq!(response.text, "Hello from the mock.");
    assert_eq!(mock.state.uploaded.lock().unwrap().len(), 64 * 1024);
}

#[tokio::test]
async fn stalled_small_upload_hits_request_timeout() {
    let mock = Mock::start_slow_upload(Duration::from_millis(600)).await;
    let section = format!("{ASSEMBLYAI}request_timeout = \"200ms\"\n");
    let server = stt::build_server(&config(&mock, &section)).unwrap();
    let (_file, request) = media_file(b"tiny");

    let err = server.transcribe(&request).await.unwrap_err();

    assert!(matches!(err, SttError::ConnectionError(_)), "unexpected error: {err}");
    assert_eq!(mock.state.polls.load(Ordering::Relaxed), 0);
}

#[tokio::test]
async fn whisper_sends_file_and_model() {
    let mock = Mock::start(1, None).await;
    let section = r#"
        [stt.providers.openai]
        type = "whisper"
        api_key = "sk-test"
    "#;
    let server = stt::build_server(&config(&mock, section)).unwrap();
    let (_file, request) = media_file(b"0123456789");

    let response = server.transcribe(&request).await.unwrap();

    assert_eq!(response.text, "whisper-1 heard 10 bytes");
}

#[tokio::test]
async fn missing_media_file_is_io_error() {
    let mock = Mock::start(1, None).await;
    let server = stt::build_server(&config(&mock, ASSEMBLYAI)).unwrap();
    let request = TranscriptionRequest {
        path: std::env::temp_dir().join("dubber-does-not-exist.mp4"),
        filename: "gone.mp4".to_owned(),
        content_type: "video/mp4".to_owned(),
    };

    let err = server.transcribe(&request).await.unwrap_err();

    assert!(matches!(err, SttError::Io(_)));
}
