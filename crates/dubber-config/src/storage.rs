use std::path::PathBuf;

use serde::Deserialize;

/// Local directories used for uploads and generated audio
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Scratch directory for uploaded videos, emptied as requests finish
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: PathBuf,
    /// Directory synthesized audio is written to and served from
    #[serde(default = "default_audio_dir")]
    pub audio_dir: PathBuf,
    /// Largest accepted request body for video uploads
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            uploads_dir: default_uploads_dir(),
            audio_dir: default_audio_dir(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_uploads_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_audio_dir() -> PathBuf {
    PathBuf::from("audio")
}

#[allow(clippy::missing_const_for_fn)]
fn default_max_upload_bytes() -> usize {
    512 << 20
}
