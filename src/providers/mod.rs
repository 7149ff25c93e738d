pub mod openai;
pub mod traits;

pub use openai::openai::OpenAIProvider;
pub use traits::CompletionProvider;
