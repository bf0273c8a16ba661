//! Document question-answering facade.
//!
//! [`DocumentQa`] coordinates the per-document workflow by composing a
//! [`Chunker`], an [`EmbeddingProvider`], a [`VectorStore`] and a
//! [`CompletionProvider`]. Its caller-facing operations never return errors:
//! ingest and delete report success as a `bool`, and answering returns a
//! [`QueryOutcome`]. Failures are logged with the document ID.
//!
//! # Example
//!
//! ```rust,ignore
//! use docqa_rag::{DocumentQa, HashingEmbedder, InMemoryVectorStore, RagConfig};
//!
//! let qa = DocumentQa::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(HashingEmbedder::default()))
//!     .completion_provider(Arc::new(my_llm))
//!     .vector_store(Arc::new(InMemoryVectorStore::new()))
//!     .build()?;
//!
//! assert!(qa.ingest(42, &extracted_text).await);
//! let outcome = qa.answer(42, "What is the capital of France?").await;
//! println!("{} {:?}", outcome.answer_text(), outcome.sources());
//! ```

use std::sync::Arc;

use tracing::{error, info};

use crate::answer::{QueryAnswerer, QueryOutcome};
use crate::chunking::{BoundaryChunker, Chunker};
use crate::completion::CompletionProvider;
use crate::config::RagConfig;
use crate::document::{DocumentId, DocumentIndex, DocumentStatus};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::index::IndexStore;
use crate::vectorstore::VectorStore;

/// The per-document RAG orchestrator.
///
/// Ingestion runs chunk → embed → replace; answering runs
/// embed → rank → prompt → complete. Construct one via
/// [`DocumentQa::builder()`].
pub struct DocumentQa {
    chunker: Arc<dyn Chunker>,
    index_store: IndexStore,
    answerer: QueryAnswerer,
}

impl DocumentQa {
    /// Create a new [`DocumentQaBuilder`].
    pub fn builder() -> DocumentQaBuilder {
        DocumentQaBuilder::default()
    }

    /// Chunk, embed and persist `text` as the index of `document_id`,
    /// replacing any previous index.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ChunkingError`] if the text yields no chunks, and
    /// any error from [`IndexStore::build`]. A failed ingest leaves the prior
    /// index in place.
    pub async fn try_ingest(&self, document_id: DocumentId, text: &str) -> Result<DocumentIndex> {
        let chunks = self.chunker.split(text);
        if chunks.is_empty() {
            return Err(RagError::ChunkingError(format!(
                "document {document_id} has no text to index"
            )));
        }
        self.index_store.build(document_id, chunks).await
    }

    /// Index `text` for `document_id`. Returns `true` on success.
    pub async fn ingest(&self, document_id: DocumentId, text: &str) -> bool {
        match self.try_ingest(document_id, text).await {
            Ok(index) => {
                info!(document.id = document_id, chunk_count = index.len(), "ingested document");
                true
            }
            Err(e) => {
                error!(document.id = document_id, error = %e, "failed to ingest document");
                false
            }
        }
    }

    /// Answer `question` from the index of `document_id`.
    pub async fn answer(&self, document_id: DocumentId, question: &str) -> QueryOutcome {
        self.answerer.answer(document_id, question).await
    }

    /// Remove all indexed state for `document_id`.
    ///
    /// Returns `true` if an index was removed; deleting an unindexed document
    /// returns `false` and is otherwise a no-op.
    pub async fn delete(&self, document_id: DocumentId) -> bool {
        match self.index_store.delete(document_id).await {
            Ok(removed) => removed,
            Err(e) => {
                error!(document.id = document_id, error = %e, "failed to delete index");
                false
            }
        }
    }

    /// Returns `true` if `document_id` has an index and can be queried.
    pub async fn is_indexed(&self, document_id: DocumentId) -> bool {
        match self.index_store.exists(document_id).await {
            Ok(exists) => exists,
            Err(e) => {
                error!(document.id = document_id, error = %e, "failed to check index");
                false
            }
        }
    }

    /// Current status of `document_id` as seen by the store.
    pub async fn status(&self, document_id: DocumentId) -> DocumentStatus {
        if self.is_indexed(document_id).await {
            DocumentStatus::Indexed
        } else {
            DocumentStatus::Unindexed
        }
    }
}

/// Builder for constructing a [`DocumentQa`].
///
/// All fields except `chunker` are required; the chunker defaults to a
/// [`BoundaryChunker`] sized from the configuration. Call
/// [`build()`](DocumentQaBuilder::build) to validate and produce the facade.
#[derive(Default)]
pub struct DocumentQaBuilder {
    config: Option<RagConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    completion_provider: Option<Arc<dyn CompletionProvider>>,
    vector_store: Option<Arc<dyn VectorStore>>,
    chunker: Option<Arc<dyn Chunker>>,
}

impl DocumentQaBuilder {
    /// Set the configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the language-model completion provider.
    pub fn completion_provider(mut self, provider: Arc<dyn CompletionProvider>) -> Self {
        self.completion_provider = Some(provider);
        self
    }

    /// Set the vector store backend.
    pub fn vector_store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.vector_store = Some(store);
        self
    }

    /// Override the document chunker.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Build the [`DocumentQa`], validating the configuration and that all
    /// required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if any required field is missing or
    /// the configuration is invalid.
    pub fn build(self) -> Result<DocumentQa> {
        let config =
            self.config.ok_or_else(|| RagError::ConfigError("config is required".to_string()))?;
        config.validate()?;
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::ConfigError("embedding_provider is required".to_string()))?;
        let completion_provider = self
            .completion_provider
            .ok_or_else(|| RagError::ConfigError("completion_provider is required".to_string()))?;
        let vector_store = self
            .vector_store
            .ok_or_else(|| RagError::ConfigError("vector_store is required".to_string()))?;
        let chunker: Arc<dyn Chunker> = match self.chunker {
            Some(chunker) => chunker,
            None => Arc::new(BoundaryChunker::from_config(&config)?),
        };

        let index_store = IndexStore::new(embedding_provider, vector_store);
        let answerer = QueryAnswerer::new(index_store.clone(), completion_provider, config);
        Ok(DocumentQa { chunker, index_store, answerer })
    }
}
