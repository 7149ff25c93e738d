use crate::providers::CompletionProvider;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use parking_lot::Mutex;

#[derive(Debug, Clone, Default)]
pub(crate) struct RecordedRequest {
    pub system: String,
    pub user: String,
    pub attachment: Vec<u8>,
    pub file_id: Option<String>,
}

/// Provider double that answers every call with the same scripted reply.
pub(crate) struct ScriptedProvider {
    reply: std::result::Result<String, String>,
    calls: Mutex<Vec<&'static str>>,
    last: Mutex<Option<RecordedRequest>>,
}

impl ScriptedProvider {
    pub fn replying(text: &str) -> Self {
        Self::with_reply(Ok(text.to_string()))
    }

    pub fn failing(detail: &str) -> Self {
        Self::with_reply(Err(detail.to_string()))
    }

    fn with_reply(reply: std::result::Result<String, String>) -> Self {
        Self {
            reply,
            calls: Mutex::new(Vec::new()),
            last: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().clone()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.last.lock().clone()
    }

    fn respond(&self, call: &'static str, request: RecordedRequest) -> Result<String> {
        self.calls.lock().push(call);
        *self.last.lock() = Some(request);
        self.reply.clone().map_err(|detail| anyhow!(detail))
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete_with_image(&self, system: &str, task: &str, jpeg: &[u8]) -> Result<String> {
        self.respond(
            "image",
            RecordedRequest {
                system: system.to_string(),
                user: task.to_string(),
                attachment: jpeg.to_vec(),
                file_id: None,
            },
        )
    }

    async fn upload_document(&self, filename: &str, bytes: Vec<u8>) -> Result<String> {
        self.respond(
            "upload",
            RecordedRequest {
                user: filename.to_string(),
                attachment: bytes,
                ..Default::default()
            },
        )
        .map(|_| "file-test".to_string())
    }

    async fn complete_with_file(&self, system: &str, task: &str, file_id: &str) -> Result<String> {
        self.respond(
            "file",
            RecordedRequest {
                system: system.to_string(),
                user: task.to_string(),
                attachment: Vec::new(),
                file_id: Some(file_id.to_string()),
            },
        )
    }

    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        self.respond(
            "text",
            RecordedRequest {
                system: system.to_string(),
                user: prompt.to_string(),
                ..Default::default()
            },
        )
    }

    fn get_model_info(&self) -> String {
        "scripted".to_string()
    }
}
