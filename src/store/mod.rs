pub mod memory;
mod provision;
pub mod spanner;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::TodoFields;

pub use memory::MemoryStore;
pub use spanner::SpannerStore;

/// A stored document and its key
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: TodoFields,
}

/// Handle to a single named collection in a document database
///
/// Every operation is atomic per document; nothing spans documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Allocate a fresh, unused document key
    fn new_document_id(&self) -> String;

    /// Fetch a document's fields, or `None` if no such document exists
    async fn get(&self, id: &str) -> Result<Option<TodoFields>>;

    /// Create or replace a document
    async fn set(&self, id: &str, data: &TodoFields) -> Result<()>;

    /// Merge top-level keys into an existing document
    ///
    /// Returns `false` without writing anything if the document is absent.
    async fn update(&self, id: &str, partial: &TodoFields) -> Result<bool>;

    /// Remove a document. Removing an absent document is not an error.
    async fn delete(&self, id: &str) -> Result<()>;

    /// Every document in the collection
    async fn stream_all(&self) -> Result<Vec<Document>>;

    /// Lightweight connectivity probe
    async fn health_check(&self) -> Result<()>;
}

/// Generate a document key: 32 lowercase hex characters
pub(crate) fn generate_document_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
