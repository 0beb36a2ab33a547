//! Local files owned by the server: uploaded videos and synthesized audio.

use std::path::{Path, PathBuf};

use axum::extract::multipart::Field;
use tokio::io::AsyncWriteExt;

use crate::error::{Result, ServerError};

/// Directory that holds uploads while they are being transcribed
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    max_bytes: usize,
}

impl UploadStore {
    pub fn new(dir: PathBuf, max_bytes: usize) -> Self {
        Self { dir, max_bytes }
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Stream a multipart field to disk under a fresh unique name
    ///
    /// Only the extension of the client filename survives; the filename
    /// itself is kept for the transcription request but never names a path.
    pub async fn save(&self, mut field: Field<'_>, filename: String) -> Result<UploadedVideo> {
        let content_type = field
            .content_type()
            .map_or_else(|| guess_content_type(&filename), str::to_owned);

        let key = unique_name("upload", extension_of(&filename));
        let upload = UploadedVideo {
            path: self.dir.join(key),
            filename,
            content_type,
            discarded: false,
        };

        let mut file = tokio::fs::File::create(&upload.path).await?;
        let mut written = 0usize;

        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| ServerError::from_multipart(&e, self.max_bytes))?
        {
            written += chunk.len();
            file.write_all(&chunk).await?;
        }

        file.flush().await?;
        drop(file);

        tracing::debug!(path = %upload.path.display(), bytes = written, "upload stored");

        Ok(upload)
    }
}

/// An upload on disk, removed by [`discard`](Self::discard) or on drop
#[derive(Debug)]
pub struct UploadedVideo {
    path: PathBuf,
    filename: String,
    content_type: String,
    discarded: bool,
}

impl UploadedVideo {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn transcription_request(&self) -> stt::TranscriptionRequest {
        stt::TranscriptionRequest {
            path: self.path.clone(),
            filename: self.filename.clone(),
            content_type: self.content_type.clone(),
        }
    }

    /// Delete the file now; failures are logged, never returned
    pub async fn discard(&mut self) {
        if self.discarded {
            return;
        }

        self.discarded = true;

        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => tracing::debug!(path = %self.path.display(), "upload removed"),
            Err(e) => tracing::warn!(path = %self.path.display(), "failed to remove upload: {e}"),
        }
    }
}

impl Drop for UploadedVideo {
    /// Removal runs on the blocking pool when a runtime is available
    fn drop(&mut self) {
        if self.discarded {
            return;
        }

        let path = std::mem::take(&mut self.path);

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn_blocking(move || remove_leftover(&path));
            }
            Err(_) => remove_leftover(&path),
        }
    }
}

fn remove_leftover(path: &Path) {
    if let Err(e) = std::fs::remove_file(path)
        && e.kind() != std::io::ErrorKind::NotFound
    {
        tracing::warn!(path = %path.display(), "failed to remove upload: {e}");
    }
}

/// Directory that synthesized audio is written to and served from
#[derive(Debug, Clone)]
pub struct AudioStore {
    dir: PathBuf,
}

impl AudioStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Write audio under a fresh unique name and return that name
    pub async fn save(&self, audio: &[u8], extension: &str) -> Result<String> {
        let name = unique_name("audio", Some(extension));
        tokio::fs::write(self.dir.join(&name), audio).await?;

        tracing::debug!(name = %name, bytes = audio.len(), "audio stored");

        Ok(name)
    }

    /// Open a stored audio file by name
    ///
    /// Names that could leave the audio directory are treated as missing.
    pub async fn open(&self, name: &str) -> Result<(tokio::fs::File, u64)> {
        if !is_plain_file_name(name) {
            return Err(ServerError::AudioNotFound);
        }

        let path = self.dir.join(name);

        let file = match tokio::fs::File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(ServerError::AudioNotFound),
            Err(e) => return Err(e.into()),
        };

        let metadata = file.metadata().await?;
        if !metadata.is_file() {
            return Err(ServerError::AudioNotFound);
        }

        Ok((file, metadata.len()))
    }
}

fn unique_name(prefix: &str, extension: Option<&str>) -> String {
    let id = uuid::Uuid::new_v4().simple();

    match extension {
        Some(ext) => format!("{prefix}-{id}.{ext}"),
        None => format!("{prefix}-{id}"),
    }
}

/// Lowercased extension of a client filename, when it is a plain alphanumeric one
fn extension_of(filename: &str) -> Option<&str> {
    let (_, ext) = filename.rsplit_once('.')?;

    (!ext.is_empty() && ext.len() <= 16 && ext.chars().all(|c| c.is_ascii_alphanumeric())).then_some(ext)
}

fn guess_content_type(filename: &str) -> String {
    mime_guess::from_path(filename).first_or_octet_stream().to_string()
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty() && name != "." && !name.contains(['/', '\\']) && !name.contains("..")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_kept_when_plain() {
        assert_eq!(extension_of("holiday.mp4"), Some("mp4"));
        assert_eq!(extension_of("archive.tar.gz"), Some("gz"));
        assert_eq!(extension_of("no_extension"), None);
        assert_eq!(extension_of("trailing."), None);
        assert_eq!(extension_of("weird.m p4"), None);
    }

    #[test]
    fn unique_names_differ() {
        let first = unique_name("upload", Some("mp4"));
        let second = unique_name("upload", Some("mp4"));

        assert_ne!(first, second);
        assert!(first.starts_with("upload-"));
        assert!(first.ends_with(".mp4"));
    }

    #[test]
    fn traversal_names_are_rejected() {
        assert!(is_plain_file_name("audio-1234.mp3"));
        assert!(!is_plain_file_name(""));
        assert!(!is_plain_file_name("."));
        assert!(!is_plain_file_name("../secret.mp3"));
        assert!(!is_plain_file_name("..secret"));
        assert!(!is_plain_file_name("nested/file.mp3"));
        assert!(!is_plain_file_name("nested\\file.mp3"));
    }

    #[tokio::test]
    async fn stored_audio_can_be_opened() {
        let dir = tempfile::tempdir().unwrap();
        let store = AudioStore::new(dir.path().to_path_buf());

        let name = store.save(b"ID3 fake mp3", "mp3").await.unwrap();
        let (_file, len) = store.open(&name).await.unwrap();

        assert!(name.ends_with(".mp3"));
        assert_eq!(len, 12);
    }

    #[tokio::test]
    async fn missing_and_escaping_audio_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let audio_dir = dir.path().join("audio");
        std::fs::create_dir(&audio_dir).unwrap();
        std::fs::write(dir.path().join("outside.mp3"), b"secret").unwrap();

        let store = AudioStore::new(audio_dir);

        assert!(matches!(store.open("absent.mp3").await, Err(ServerError::AudioNotFound)));
        assert!(matches!(store.open("../outside.mp3").await, Err(ServerError::AudioNotFound)));
    }

    #[tokio::test]
    async fn discarded_upload_is_gone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upload-test.mp4");
        std::fs::write(&path, b"video").unwrap();

        let mut upload = UploadedVideo {
            path: path.clone(),
            filename: "clip.mp4".to_string(),
            content_type: "video/mp4".to_string(),
            discarded: false,
        };

        upload.discard().await;
        assert!(!path.exists());
    }

    #[test]
    fn dropped_upload_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upload-test.mp4");
        std::fs::write(&path, b"video").unwrap();

        drop(UploadedVideo {
            path: path.clone(),
            filename: "clip.mp4".to_string(),
            content_type: "video/mp4".to_string(),
            discarded: false,
        });

        assert!(!path.exists());
    }

    #[tokio::test]
    async fn upload_dropped_inside_runtime_is_removed_off_thread() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upload-test.mp4");
        std::fs::write(&path, b"video").unwrap();

        drop(UploadedVideo {
            path: path.clone(),
            filename: "clip.mp4".to_string(),
            content_type: "video/mp4".to_string(),
            discarded: false,
        });

        for _ in 0..100 {
            if !path.exists() {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }

        panic!("upload still present at {}", path.display());
    }
}
