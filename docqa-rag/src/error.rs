//! Error types for the `docqa-rag` crate.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::document::DocumentId;

/// Errors that can occur in indexing and question-answering operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// A configuration validation error. Fatal at startup.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An error occurred during document chunking.
    #[error("Chunking error: {0}")]
    ChunkingError(String),

    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The language-model completion call failed.
    #[error("Completion error ({provider}): {message}")]
    CompletionError {
        /// The completion provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// No index exists for the requested document.
    #[error("Document {document_id} is not indexed")]
    IndexNotFound {
        /// The document that was queried.
        document_id: DocumentId,
    },

    /// An error occurred in the vector store backend.
    #[error("Vector store error ({backend}): {message}")]
    VectorStoreError {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// Text could not be extracted from an uploaded file.
    #[error("Extraction error: {0}")]
    ExtractionError(String),
}

impl RagError {
    /// Classify this error for callers that map failures to user messages.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            RagError::IndexNotFound { .. } => FailureKind::NotIndexed,
            RagError::EmbeddingError { .. } | RagError::CompletionError { .. } => {
                FailureKind::UpstreamUnavailable
            }
            RagError::VectorStoreError { .. } => FailureKind::Storage,
            RagError::ConfigError(_)
            | RagError::ChunkingError(_)
            | RagError::ExtractionError(_) => FailureKind::InvalidInput,
        }
    }
}

/// The failure taxonomy surfaced to callers.
///
/// `NotIndexed` and `UpstreamUnavailable` are deliberately distinct so a
/// caller can answer "not processed yet" and "service temporarily
/// unavailable" differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The document has no index.
    NotIndexed,
    /// The embedding or language-model service failed.
    UpstreamUnavailable,
    /// The index could not be read or written.
    Storage,
    /// The request itself was unusable (e.g. an empty question).
    InvalidInput,
}

/// A convenience result type for RAG operations.
pub type Result<T> = std::result::Result<T, RagError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_and_upstream_are_distinct() {
        let not_found = RagError::IndexNotFound { document_id: 7 };
        let upstream =
            RagError::CompletionError { provider: "Groq".into(), message: "rate limited".into() };
        assert_eq!(not_found.failure_kind(), FailureKind::NotIndexed);
        assert_eq!(upstream.failure_kind(), FailureKind::UpstreamUnavailable);
        assert_ne!(not_found.failure_kind(), upstream.failure_kind());
    }

    #[test]
    fn embedding_failures_are_upstream() {
        let err = RagError::EmbeddingError { provider: "OpenAI".into(), message: "timeout".into() };
        assert_eq!(err.failure_kind(), FailureKind::UpstreamUnavailable);
        assert_eq!(err.to_string(), "Embedding error (OpenAI): timeout");
    }

    #[test]
    fn store_failures_are_storage() {
        let err =
            RagError::VectorStoreError { backend: "File".into(), message: "disk full".into() };
        assert_eq!(err.failure_kind(), FailureKind::Storage);
    }
}
