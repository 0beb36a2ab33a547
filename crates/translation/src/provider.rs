pub(crate) mod google_cloud;
pub(crate) mod google_web;

use async_trait::async_trait;

/// One translated chunk of text
pub(crate) struct TranslatedChunk {
    pub text: String,
    pub detected_source: Option<String>,
}

/// Trait for translation provider implementations
///
/// Providers translate a single chunk no longer than [`max_chars`](Self::max_chars);
/// splitting longer text is the server's job.
#[async_trait]
pub(crate) trait TranslationProvider: Send + Sync {
    /// Translate one chunk of text
    async fn translate_chunk(&self, text: &str, source: &str, target: &str) -> crate::error::Result<TranslatedChunk>;

    /// Longest chunk the provider accepts, in characters
    fn max_chars(&self) -> usize;

    /// Get the provider name
    fn name(&self) -> &str;
}
