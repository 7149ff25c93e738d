use async_trait::async_trait;
use anyhow::Result;

/// The model capabilities the claims pipelines rely on.
///
/// Any provider that can answer a prompt with an inline image, answer a prompt
/// about an uploaded file, and answer a plain text prompt can back the service.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Completion for `task` with a JPEG attached inline.
    async fn complete_with_image(&self, system: &str, task: &str, jpeg: &[u8]) -> Result<String>;

    /// Uploads a document and returns the provider's file reference.
    async fn upload_document(&self, filename: &str, bytes: Vec<u8>) -> Result<String>;

    /// Completion for `task` referencing a previously uploaded file.
    async fn complete_with_file(&self, system: &str, task: &str, file_id: &str) -> Result<String>;

    /// Plain text completion.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String>;

    fn get_model_info(&self) -> String;
}
