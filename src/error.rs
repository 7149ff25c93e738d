use thiserror::Error;

/// Failures surfaced by the extraction and question-answering pipelines.
///
/// Every variant is terminal for the request that produced it; nothing is
/// retried and nothing is stored once one of these is returned.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("empty document uploaded")]
    EmptyInput,

    #[error("unsupported media type: {0}")]
    UnsupportedMedia(String),

    #[error("image could not be decoded: {0}")]
    InvalidImage(String),

    #[error("upstream model call failed: {0}")]
    Upstream(String),

    #[error("model output is not valid JSON")]
    MalformedOutput,

    #[error("document not found: {0}")]
    NotFound(String),
}

impl PipelineError {
    pub fn upstream(error: impl std::fmt::Display) -> Self {
        PipelineError::Upstream(error.to_string())
    }
}

pub type Result<T, E = PipelineError> = std::result::Result<T, E>;
