/// Text to speak in a given language
#[derive(Debug, Clone)]
pub struct SpeechRequest {
    /// Text to synthesize into speech
    pub input: String,
    /// Language code of the text (e.g. "ta")
    pub language: String,
}

/// Raw audio response from a TTS provider
#[derive(Debug)]
pub struct SpeechResponse {
    /// Raw audio bytes
    pub audio: Vec<u8>,
    /// Content type of the audio (e.g. "audio/mpeg")
    pub content_type: String,
}

impl SpeechResponse {
    /// File extension matching the audio content type
    pub fn extension(&self) -> &'static str {
        let essence = self.content_type.split(';').next().unwrap_or_default().trim();

        match essence {
            "audio/wav" | "audio/x-wav" | "audio/wave" => "wav",
            "audio/opus" => "opus",
            "audio/aac" => "aac",
            "audio/flac" => "flac",
            _ => "mp3",
        }
    }
}
