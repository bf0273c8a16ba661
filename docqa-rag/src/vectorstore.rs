//! Vector store trait for persisting per-document indexes.

use std::sync::Arc;

use async_trait::async_trait;

use crate::document::{DocumentId, DocumentIndex};
use crate::error::Result;

/// A storage backend holding one [`DocumentIndex`] per document.
///
/// Documents are fully isolated: every operation addresses exactly one
/// document and there is no cross-document search. Implementations must make
/// [`replace`](VectorStore::replace) atomic with respect to
/// [`load`](VectorStore::load): a reader sees either the previous complete
/// index or the new complete index, never a mix.
///
/// # Example
///
/// ```rust,ignore
/// use docqa_rag::{InMemoryVectorStore, VectorStore};
///
/// let store = InMemoryVectorStore::new();
/// store.replace(index).await?;
/// let loaded = store.load(42).await?;
/// assert!(store.delete(42).await?);
/// ```
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Store `index`, replacing any index previously stored for its document.
    async fn replace(&self, index: DocumentIndex) -> Result<()>;

    /// Load the index for a document, or `None` if it has none.
    async fn load(&self, document_id: DocumentId) -> Result<Option<Arc<DocumentIndex>>>;

    /// Remove the index for a document.
    ///
    /// Returns `false` if there was nothing to delete.
    async fn delete(&self, document_id: DocumentId) -> Result<bool>;

    /// Returns `true` if an index exists for the document.
    async fn exists(&self, document_id: DocumentId) -> Result<bool> {
        Ok(self.load(document_id).await?.is_some())
    }
}
