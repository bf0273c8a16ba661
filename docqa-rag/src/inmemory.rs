//! In-memory vector store.
//!
//! This module provides [`InMemoryVectorStore`], a zero-dependency backend
//! holding each document's index behind an `Arc` in a `HashMap` protected by
//! a `tokio::sync::RwLock`. It is suitable for development, testing, and
//! deployments that rebuild indexes on start-up.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::{DocumentId, DocumentIndex};
use crate::error::Result;
use crate::vectorstore::VectorStore;

/// An in-memory [`VectorStore`].
///
/// Replacing an index swaps a single map entry under the write lock, so
/// readers holding the previous `Arc` keep a consistent snapshot.
///
/// # Example
///
/// ```rust,ignore
/// use docqa_rag::{InMemoryVectorStore, VectorStore};
///
/// let store = InMemoryVectorStore::new();
/// assert!(!store.exists(1).await?);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    indexes: RwLock<HashMap<DocumentId, Arc<DocumentIndex>>>,
}

impl InMemoryVectorStore {
    /// Create a new empty in-memory vector store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently indexed.
    pub async fn len(&self) -> usize {
        self.indexes.read().await.len()
    }

    /// Returns `true` if no document is indexed.
    pub async fn is_empty(&self) -> bool {
        self.indexes.read().await.is_empty()
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn replace(&self, index: DocumentIndex) -> Result<()> {
        let mut indexes = self.indexes.write().await;
        indexes.insert(index.document_id, Arc::new(index));
        Ok(())
    }

    async fn load(&self, document_id: DocumentId) -> Result<Option<Arc<DocumentIndex>>> {
        let indexes = self.indexes.read().await;
        Ok(indexes.get(&document_id).cloned())
    }

    async fn delete(&self, document_id: DocumentId) -> Result<bool> {
        let mut indexes = self.indexes.write().await;
        Ok(indexes.remove(&document_id).is_some())
    }

    async fn exists(&self, document_id: DocumentId) -> Result<bool> {
        Ok(self.indexes.read().await.contains_key(&document_id))
    }
}
