//! Data types for document indexes, chunks, and search results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of an uploaded document, assigned by the caller.
pub type DocumentId = u64;

/// A segment of a document's text with its vector embedding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Unique identifier for the chunk, `{document_id}_{index}`.
    pub id: String,
    /// The ID of the parent document.
    pub document_id: DocumentId,
    /// 0-based position of the chunk within the document.
    pub index: usize,
    /// The text content of the chunk.
    pub text: String,
    /// The vector embedding for this chunk's text.
    pub embedding: Vec<f32>,
}

impl Chunk {
    /// Create a chunk without an embedding.
    pub fn new(document_id: DocumentId, index: usize, text: impl Into<String>) -> Self {
        Self {
            id: format!("{document_id}_{index}"),
            document_id,
            index,
            text: text.into(),
            embedding: Vec::new(),
        }
    }
}

/// The complete, persisted index of one document.
///
/// An index is always written and replaced as a whole; there is no
/// partial update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentIndex {
    /// The document this index belongs to.
    pub document_id: DocumentId,
    /// Name of the embedding model that produced the vectors.
    pub model: String,
    /// Dimensionality of every chunk embedding.
    pub dimensions: usize,
    /// When the index was built.
    pub created_at: DateTime<Utc>,
    /// Chunks in document order.
    pub chunks: Vec<Chunk>,
}

impl DocumentIndex {
    /// Number of chunks in the index.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Returns `true` if the index holds no chunks.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

/// A retrieved [`Chunk`] paired with a relevance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// The similarity score (higher is more relevant).
    pub score: f32,
}

/// Processing status of a document, as tracked by the caller.
///
/// ```text
/// Unindexed ──▶ Indexing ──▶ Indexed
///                   │            │ delete
///                   ▼            ▼
///            IndexingFailed   Unindexed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    /// No index exists yet.
    Unindexed,
    /// An ingest is in progress.
    Indexing,
    /// The index is complete and can be queried.
    Indexed,
    /// The last ingest failed; no new index was written.
    IndexingFailed,
}

impl DocumentStatus {
    /// Status after an ingest attempt that reported `success`.
    pub fn after_ingest(success: bool) -> Self {
        if success { DocumentStatus::Indexed } else { DocumentStatus::IndexingFailed }
    }

    /// Questions may only be asked about indexed documents.
    pub fn accepts_queries(self) -> bool {
        self == DocumentStatus::Indexed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_id_combines_document_and_index() {
        let chunk = Chunk::new(42, 3, "text");
        assert_eq!(chunk.id, "42_3");
        assert!(chunk.embedding.is_empty());
    }

    #[test]
    fn only_indexed_documents_accept_queries() {
        assert!(DocumentStatus::after_ingest(true).accepts_queries());
        assert!(!DocumentStatus::after_ingest(false).accepts_queries());
        assert!(!DocumentStatus::Indexing.accepts_queries());
        assert!(!DocumentStatus::Unindexed.accepts_queries());
    }
}
