use std::sync::Arc;

use serde::Serialize;

use crate::{
    error::{Result, ServerError},
    storage::{AudioStore, UploadedVideo},
};

/// Transcribe, translate, and voice an uploaded video
///
/// Steps run strictly in order; the first failure ends the run and nothing
/// after it is called.
pub struct Pipeline {
    pub(crate) stt: Arc<stt::Server>,
    pub(crate) translation: Arc<translation::Server>,
    pub(crate) tts: Arc<tts::Server>,
    pub(crate) audio: AudioStore,
    pub(crate) source_language: String,
    pub(crate) target_language: String,
    pub(crate) public_base_url: String,
}

/// Body of a successful `POST /process-video`
#[derive(Debug, Serialize)]
pub struct DubbingResult {
    pub english_text: String,
    pub tamil_text: String,
    pub audio_url: String,
}

impl Pipeline {
    pub async fn run(&self, mut upload: UploadedVideo) -> Result<DubbingResult> {
        tracing::info!(path = %upload.path().display(), "transcribing upload");

        let transcript = self.stt.transcribe(&upload.transcription_request()).await;
        upload.discard().await;
        let transcript = transcript?;

        let english_text = transcript.text.trim().to_string();
        if english_text.is_empty() {
            return Err(ServerError::NoSpeech);
        }

        tracing::info!(chars = english_text.chars().count(), "translating transcript");

        let translated = self
            .translation
            .translate(&translation::TranslationRequest {
                text: english_text.clone(),
                source: self.source_language.clone(),
                target: self.target_language.clone(),
            })
            .await?;

        tracing::info!(
            chars = translated.text.chars().count(),
            detected_source = translated.detected_source.as_deref().unwrap_or(self.source_language.as_str()),
            language = %self.target_language,
            "synthesizing speech"
        );

        let speech = self
            .tts
            .synthesize(&tts::SpeechRequest {
                input: translated.text.clone(),
                language: self.target_language.clone(),
            })
            .await?;

        let name = self.audio.save(&speech.audio, speech.extension()).await?;
        let audio_url = format!("{}/audio/{name}", self.public_base_url);

        tracing::info!(%audio_url, "dubbing complete");

        Ok(DubbingResult {
            english_text,
            tamil_text: translated.text,
            audio_url,
        })
    }
}
