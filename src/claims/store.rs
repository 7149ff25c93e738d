use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt::Write as _;

/// A claim extraction kept for later questions.
#[derive(Debug, Clone)]
pub struct StoredDocument {
    pub structured: Value,
    pub raw_text: String,
    pub created_at: DateTime<Utc>,
}

/// In-memory document store shared by both pipelines.
///
/// Entries live until the process exits or `clear` is called. Each entry is
/// written once and only read afterwards, so a single store-wide lock is enough.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: RwLock<HashMap<String, StoredDocument>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a new extraction under a freshly generated identifier.
    pub fn insert(&self, structured: Value, raw_text: String) -> String {
        let document = StoredDocument {
            structured,
            raw_text,
            created_at: Utc::now(),
        };

        let mut documents = self.documents.write();
        let mut id = generate_document_id();
        while documents.contains_key(&id) {
            id = generate_document_id();
        }
        documents.insert(id.clone(), document);
        id
    }

    pub fn get(&self, id: &str) -> Option<StoredDocument> {
        self.documents.read().get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.documents.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }

    /// Drops every stored document.
    pub fn clear(&self) {
        self.documents.write().clear();
    }
}

/// 256 random bits rendered as 64 lowercase hex characters.
pub fn generate_document_id() -> String {
    let bytes: [u8; 32] = rand::random();
    let mut id = String::with_capacity(64);
    for byte in bytes {
        let _ = write!(id, "{:02x}", byte);
    }
    id
}
