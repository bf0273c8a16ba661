//! Per-document index building and retrieval.
//!
//! [`IndexStore`] composes an [`EmbeddingProvider`] with a [`VectorStore`]
//! backend. Building embeds every chunk of a document and hands a complete
//! [`DocumentIndex`] to the backend; retrieval embeds the query and ranks
//! that document's chunks by cosine similarity.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::document::{Chunk, DocumentId, DocumentIndex, SearchResult};
use crate::embedding::{EmbeddingProvider, cosine_similarity};
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// Embedding-backed storage of per-document chunk indexes.
///
/// # Example
///
/// ```rust,ignore
/// use docqa_rag::{HashingEmbedder, IndexStore, InMemoryVectorStore};
///
/// let store = IndexStore::new(
///     Arc::new(HashingEmbedder::default()),
///     Arc::new(InMemoryVectorStore::new()),
/// );
/// store.build(1, vec!["Paris is the capital of France.".into()]).await?;
/// let hits = store.retrieve(1, "capital of France", 3).await?;
/// ```
#[derive(Clone)]
pub struct IndexStore {
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
}

impl IndexStore {
    /// Create an index store from its two collaborators.
    pub fn new(
        embedding_provider: Arc<dyn EmbeddingProvider>,
        vector_store: Arc<dyn VectorStore>,
    ) -> Self {
        Self { embedding_provider, vector_store }
    }

    /// Embed `chunks` and persist them as the complete index of `document_id`,
    /// replacing any previous index.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ChunkingError`] if `chunks` is empty, the
    /// provider's error if embedding fails, [`RagError::EmbeddingError`] if the
    /// provider returns the wrong number of vectors or vectors of mixed
    /// dimensionality, and the backend's error if persisting fails. On error
    /// the previous index, if any, is left untouched.
    pub async fn build(&self, document_id: DocumentId, chunks: Vec<String>) -> Result<DocumentIndex> {
        if chunks.is_empty() {
            return Err(RagError::ChunkingError(format!(
                "document {document_id} produced no chunks to index"
            )));
        }

        let texts: Vec<&str> = chunks.iter().map(String::as_str).collect();
        let embeddings = self.embedding_provider.embed_batch(&texts).await.map_err(|e| {
            error!(document.id = document_id, error = %e, "embedding failed during indexing");
            e
        })?;
        let dimensions = self.check_embeddings(chunks.len(), &embeddings)?;

        let chunks = chunks
            .into_iter()
            .zip(embeddings)
            .enumerate()
            .map(|(i, (text, embedding))| Chunk { embedding, ..Chunk::new(document_id, i, text) })
            .collect();
        let index = DocumentIndex {
            document_id,
            model: self.embedding_provider.model_name().to_string(),
            dimensions,
            created_at: Utc::now(),
            chunks,
        };

        self.vector_store.replace(index.clone()).await.map_err(|e| {
            error!(document.id = document_id, error = %e, "failed to persist index");
            e
        })?;

        info!(document.id = document_id, chunk_count = index.len(), model = %index.model, "built index");
        Ok(index)
    }

    fn check_embeddings(&self, expected: usize, embeddings: &[Vec<f32>]) -> Result<usize> {
        let provider = self.embedding_provider.model_name();
        let invalid = |message: String| RagError::EmbeddingError {
            provider: provider.to_string(),
            message,
        };

        if embeddings.len() != expected {
            return Err(invalid(format!(
                "expected {expected} embeddings, provider returned {}",
                embeddings.len()
            )));
        }

        let dimensions = embeddings.first().map_or(0, Vec::len);
        if dimensions == 0 {
            return Err(invalid("provider returned empty embeddings".to_string()));
        }
        if let Some((i, bad)) = embeddings.iter().enumerate().find(|(_, e)| e.len() != dimensions) {
            return Err(invalid(format!(
                "embedding {i} has {} dimensions, expected {dimensions}",
                bad.len()
            )));
        }
        Ok(dimensions)
    }

    /// Return the `k` chunks of `document_id` most similar to `query`.
    ///
    /// Results are ordered by descending cosine similarity; equal scores keep
    /// document order. A document with fewer than `k` chunks returns all of
    /// them.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::IndexNotFound`] if the document has no index, the
    /// provider's error if the query cannot be embedded, and
    /// [`RagError::EmbeddingError`] if the query vector does not match the
    /// index dimensionality.
    pub async fn retrieve(
        &self,
        document_id: DocumentId,
        query: &str,
        k: usize,
    ) -> Result<Vec<SearchResult>> {
        let index = self
            .vector_store
            .load(document_id)
            .await?
            .ok_or(RagError::IndexNotFound { document_id })?;

        let model = self.embedding_provider.model_name();
        if index.model != model {
            warn!(
                document.id = document_id,
                index_model = %index.model,
                provider_model = %model,
                "index was built with a different embedding model"
            );
        }

        let query_embedding = self.embedding_provider.embed(query).await.map_err(|e| {
            error!(document.id = document_id, error = %e, "embedding failed during retrieval");
            e
        })?;
        if query_embedding.len() != index.dimensions {
            return Err(RagError::EmbeddingError {
                provider: model.to_string(),
                message: format!(
                    "query embedding has {} dimensions, index {document_id} has {}",
                    query_embedding.len(),
                    index.dimensions
                ),
            });
        }

        let results = rank(&index, &query_embedding, k);
        debug!(document.id = document_id, result_count = results.len(), "retrieved chunks");
        Ok(results)
    }

    /// Remove the index of `document_id`. Returns `false` if there was none.
    pub async fn delete(&self, document_id: DocumentId) -> Result<bool> {
        let removed = self.vector_store.delete(document_id).await?;
        info!(document.id = document_id, removed, "deleted index");
        Ok(removed)
    }

    /// Returns `true` if `document_id` has an index.
    pub async fn exists(&self, document_id: DocumentId) -> Result<bool> {
        self.vector_store.exists(document_id).await
    }
}

/// Rank the chunks of `index` against `query` and keep the best `k`.
///
/// Uses a stable sort so chunks with equal scores stay in document order.
pub fn rank(index: &DocumentIndex, query: &[f32], k: usize) -> Vec<SearchResult> {
    let mut scored: Vec<(f32, &Chunk)> =
        index.chunks.iter().map(|c| (cosine_similarity(query, &c.embedding), c)).collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored
        .into_iter()
        .take(k)
        .map(|(score, chunk)| SearchResult { chunk: chunk.clone(), score })
        .collect()
}
