pub mod api;
pub mod claims;
pub mod config;
pub mod error;
pub mod providers;

// Re-export commonly used items
pub use api::{create_api, AppState};
pub use claims::{DocumentStore, ExtractionPipeline, MediaKind, QuestionAnswering, UploadedDocument};
pub use config::{Args, ProviderConfig, ServiceConfig};
pub use error::PipelineError;
pub use providers::{CompletionProvider, OpenAIProvider};
