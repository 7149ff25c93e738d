use crate::claims::media::{normalize_image, MediaKind};
use crate::claims::parser::ResponseParser;
use crate::claims::prompts::{EXTRACTION_PROMPT, EXTRACTION_TASK};
use crate::claims::schema::check_conformance;
use crate::claims::store::DocumentStore;
use crate::error::{PipelineError, Result};
use crate::providers::CompletionProvider;
use serde_json::Value;
use std::sync::Arc;

/// A claim document as received from the client.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub filename: String,
    pub media: MediaKind,
    pub bytes: Vec<u8>,
}

impl UploadedDocument {
    /// Classifies the upload by its filename.
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        let filename = filename.into();
        Self {
            media: MediaKind::from_filename(&filename),
            filename,
            bytes,
        }
    }
}

/// Outcome of a successful extraction.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub document_id: String,
    pub structured: Value,
    pub strategy: &'static str,
}

/// Drives the model to extract a claim record and stores the result.
pub struct ExtractionPipeline {
    provider: Arc<dyn CompletionProvider>,
    store: Arc<DocumentStore>,
    parser: ResponseParser,
}

impl ExtractionPipeline {
    pub fn new(provider: Arc<dyn CompletionProvider>, store: Arc<DocumentStore>) -> Self {
        Self::with_parser(provider, store, ResponseParser::default())
    }

    pub fn with_parser(
        provider: Arc<dyn CompletionProvider>,
        store: Arc<DocumentStore>,
        parser: ResponseParser,
    ) -> Self {
        Self { provider, store, parser }
    }

    pub async fn extract(&self, upload: UploadedDocument) -> Result<Extraction> {
        if upload.bytes.is_empty() {
            return Err(PipelineError::EmptyInput);
        }

        tracing::info!(
            filename = %upload.filename,
            media = %upload.media,
            bytes = upload.bytes.len(),
            "extracting claim"
        );

        let raw_text = self.request_extraction(upload).await?;
        let raw_text = raw_text.trim().to_string();

        let parsed = self.parser.parse(&raw_text).map_err(|err| {
            tracing::warn!(output_len = raw_text.len(), "model output could not be parsed as JSON");
            err
        })?;

        let violations = check_conformance(&parsed.value);
        if !violations.is_empty() {
            let summary: Vec<String> = violations.iter().map(ToString::to_string).collect();
            tracing::warn!(
                count = violations.len(),
                violations = %summary.join("; "),
                "extraction does not fully match the claim schema"
            );
        }

        let document_id = self.store.insert(parsed.value.clone(), raw_text);
        tracing::info!(%document_id, strategy = parsed.strategy, "claim stored");

        Ok(Extraction {
            document_id,
            structured: parsed.value,
            strategy: parsed.strategy,
        })
    }

    async fn request_extraction(&self, upload: UploadedDocument) -> Result<String> {
        match upload.media {
            MediaKind::RasterImage => {
                let jpeg = normalize_image(&upload.bytes)?;
                self.provider
                    .complete_with_image(EXTRACTION_PROMPT, EXTRACTION_TASK, &jpeg)
                    .await
                    .map_err(PipelineError::upstream)
            }
            MediaKind::Document => {
                let file_id = self
                    .provider
                    .upload_document(&upload.filename, upload.bytes)
                    .await
                    .map_err(PipelineError::upstream)?;
                tracing::debug!(%file_id, "document uploaded to provider");

                self.provider
                    .complete_with_file(EXTRACTION_PROMPT, EXTRACTION_TASK, &file_id)
                    .await
                    .map_err(PipelineError::upstream)
            }
            MediaKind::Unsupported(_) => Err(PipelineError::UnsupportedMedia(upload.media.to_string())),
        }
    }
}
