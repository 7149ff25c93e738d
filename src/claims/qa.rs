use crate::claims::prompts::{build_question_message, ASK_PROMPT};
use crate::claims::store::DocumentStore;
use crate::error::{PipelineError, Result};
use crate::providers::CompletionProvider;
use std::sync::Arc;

/// Answers free-text questions about stored claims.
pub struct QuestionAnswering {
    provider: Arc<dyn CompletionProvider>,
    store: Arc<DocumentStore>,
}

impl QuestionAnswering {
    pub fn new(provider: Arc<dyn CompletionProvider>, store: Arc<DocumentStore>) -> Self {
        Self { provider, store }
    }

    /// One model call per question; unknown ids fail without calling out.
    pub async fn ask(&self, document_id: &str, question: &str) -> Result<String> {
        let document = self
            .store
            .get(document_id)
            .ok_or_else(|| PipelineError::NotFound(document_id.to_string()))?;

        let message = build_question_message(&document.structured.to_string(), question);

        let answer = self
            .provider
            .complete(ASK_PROMPT, &message)
            .await
            .map_err(PipelineError::upstream)?;

        tracing::info!(%document_id, answer_len = answer.len(), "question answered");
        Ok(answer.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::testing::ScriptedProvider;
    use serde_json::json;

    fn setup(provider: &Arc<ScriptedProvider>) -> (QuestionAnswering, Arc<DocumentStore>) {
        let store = Arc::new(DocumentStore::new());
        let provider: Arc<dyn CompletionProvider> = provider.clone();
        (QuestionAnswering::new(provider, Arc::clone(&store)), store)
    }

    #[tokio::test]
    async fn returns_model_answer_verbatim() {
        let provider = Arc::new(ScriptedProvider::replying("Paracetamol was used for fever"));
        let (qa, store) = setup(&provider);
        let id = store.insert(json!({"medications": [{"name": "Paracetamol"}]}), String::new());

        let answer = qa.ask(&id, "What was paracetamol for?").await.unwrap();

        assert_eq!(answer, "Paracetamol was used for fever");
        assert_eq!(provider.calls(), vec!["text"]);
    }

    #[tokio::test]
    async fn sends_claim_and_question_with_qa_prompt() {
        let provider = Arc::new(ScriptedProvider::replying("  No medications were found.\n"));
        let (qa, store) = setup(&provider);
        let id = store.insert(json!({"diagnoses": ["Malaria"], "medications": []}), String::new());

        let answer = qa.ask(&id, "Which medications?").await.unwrap();
        assert_eq!(answer, "No medications were found.");

        let request = provider.last_request().unwrap();
        assert_eq!(request.system, ASK_PROMPT);
        assert_eq!(
            request.user,
            "Structured claim data: {\"diagnoses\":[\"Malaria\"],\"medications\":[]}\n\nQuestion: Which medications?"
        );
    }

    #[tokio::test]
    async fn free_form_record_is_sent_as_stored() {
        let provider = Arc::new(ScriptedProvider::replying("Two"));
        let (qa, store) = setup(&provider);
        let id = store.insert(json!([1, "two", {"medications": "not a list"}]), String::new());

        assert_eq!(qa.ask(&id, "How many?").await.unwrap(), "Two");
        assert_eq!(
            provider.last_request().unwrap().user,
            "Structured claim data: [1,\"two\",{\"medications\":\"not a list\"}]\n\nQuestion: How many?"
        );
    }

    #[tokio::test]
    async fn unknown_document_makes_no_call() {
        let provider = Arc::new(ScriptedProvider::replying("unused"));
        let (qa, _store) = setup(&provider);

        let err = qa.ask("deadbeef", "anything?").await.unwrap_err();

        assert!(matches!(err, PipelineError::NotFound(ref id) if id == "deadbeef"));
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn provider_failure_is_upstream() {
        let provider = Arc::new(ScriptedProvider::failing("rate limited"));
        let (qa, store) = setup(&provider);
        let id = store.insert(json!({}), String::new());

        let err = qa.ask(&id, "anything?").await.unwrap_err();
        assert!(matches!(err, PipelineError::Upstream(ref detail) if detail == "rate limited"));
        assert_eq!(provider.calls(), vec!["text"]);
    }
}
