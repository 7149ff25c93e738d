pub mod extraction;
pub mod media;
pub mod parser;
pub mod prompts;
pub mod qa;
pub mod schema;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use extraction::{Extraction, ExtractionPipeline, UploadedDocument};
pub use media::MediaKind;
pub use parser::{DirectJson, FenceStripped, ParseStrategy, ResponseParser};
pub use qa::QuestionAnswering;
pub use schema::{check_conformance, ClaimRecord, SchemaViolation};
pub use store::{DocumentStore, StoredDocument};
